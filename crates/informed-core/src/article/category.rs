use std::sync::OnceLock;

use regex::Regex;

use super::models::Category;

/// Ordered keyword rules; the first rule whose pattern matches the title wins.
const RULES: &[(Category, &str)] = &[
    (
        Category::Business,
        r"ipos?|profits?|markets?|stocks?|shares?|sensex|nifty|economy|economic|gdp|inflation|rbi|banks?|banking|earnings|revenue|investors?|rupee|tax|budget|startups?|ceo|merger|acquisition",
    ),
    (
        Category::Sports,
        r"cricket|football|ipl|t20|odi|test match|tournament|olympics?|fifa|tennis|hockey|kabaddi|wickets?|goals?|coach|league|world cup|medal|championship|bcci",
    ),
    (
        Category::Tech,
        r"tech|technology|ai|artificial intelligence|software|smartphones?|iphone|android|google|apple|microsoft|cyber|chips?|semiconductors?|internet|apps?|robots?|satellite|isro|5g|crypto",
    ),
    (
        Category::Politics,
        r"elections?|polls?|ministers?|parliament|lok sabha|rajya sabha|bjp|congress|aap|modi|government|govt|cabinet|opposition|mla|mps?|vote|voters|party|policy|governor",
    ),
    (
        Category::World,
        r"world|global|international|(?-i:UN)|(?-i:US)|usa|china|pakistan|russia|ukraine|israel|gaza|iran|europe|uk|trump|biden|nato|war",
    ),
];

fn compiled_rules() -> &'static [(Category, Regex)] {
    static COMPILED: OnceLock<Vec<(Category, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|(category, keywords)| {
                let pattern = format!(r"(?i)\b(?:{})\b", keywords);
                let regex = Regex::new(&pattern).expect("category rule patterns are valid");
                (*category, regex)
            })
            .collect()
    })
}

/// Category from the title alone, if any rule matches
pub fn match_category(title: &str) -> Option<Category> {
    compiled_rules()
        .iter()
        .find(|(_, regex)| regex.is_match(title))
        .map(|(category, _)| *category)
}

/// Title rules first, then the feed's hint, then `general`
pub fn categorize(title: &str, hint: Option<&str>) -> Category {
    match_category(title)
        .or_else(|| hint.and_then(|h| h.parse().ok()))
        .unwrap_or(Category::General)
}
