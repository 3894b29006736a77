/// Run-wide tallies. Discovery updates one instance by reference; the crawl
/// phase produces one per site and merges them at the join point.
#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    pub keywords_searched: usize,
    pub places_found: usize,
    pub places_with_website: usize,
    pub pages_visited: usize,
    pub words_scanned: usize,
    pub emails_found: usize,
}

impl RunMetrics {
    pub fn merge(&mut self, other: &RunMetrics) {
        self.keywords_searched += other.keywords_searched;
        self.places_found += other.places_found;
        self.places_with_website += other.places_with_website;
        self.pages_visited += other.pages_visited;
        self.words_scanned += other.words_scanned;
        self.emails_found += other.emails_found;
    }

    pub fn print_summary(&self) {
        println!("\n📊 Run Summary");
        println!("━━━━━━━━━━━━━━━━━━━━━");
        println!("🔎 Keywords searched: {}", self.keywords_searched);
        println!("📍 Places found: {}", self.places_found);
        println!("🌐 Places with website: {}", self.places_with_website);
        println!("📄 Pages visited: {}", self.pages_visited);
        println!("📖 Words scanned: {}", self.words_scanned);
        println!("📧 Emails found: {}", self.emails_found);
    }
}
