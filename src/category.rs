use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::HotentryError;

/// Hot entry partitions published by the upstream bookmark service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    General,
    Social,
    Economics,
    Life,
    Knowledge,
    Technology,
    Entertainment,
    GamesAnime,
    Fun,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::All,
        Category::General,
        Category::Social,
        Category::Economics,
        Category::Life,
        Category::Knowledge,
        Category::Technology,
        Category::Entertainment,
        Category::GamesAnime,
        Category::Fun,
    ];

    /// The spoken label, matched exactly against slot values.
    pub fn label(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::General => "general",
            Category::Social => "social",
            Category::Economics => "economics",
            Category::Life => "life",
            Category::Knowledge => "knowledge",
            Category::Technology => "technology",
            Category::Entertainment => "entertainment",
            Category::GamesAnime => "games-anime",
            Category::Fun => "fun",
        }
    }

    pub fn hatena_path(self) -> &'static str {
        match self {
            Category::All => "/hotentry.rss",
            Category::General => "/hotentry/general.rss",
            Category::Social => "/hotentry/social.rss",
            Category::Economics => "/hotentry/economics.rss",
            Category::Life => "/hotentry/life.rss",
            Category::Knowledge => "/hotentry/knowledge.rss",
            Category::Technology => "/hotentry/it.rss",
            Category::Entertainment => "/hotentry/entertainment.rss",
            Category::GamesAnime => "/hotentry/game.rss",
            Category::Fun => "/hotentry/fun.rss",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = HotentryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| HotentryError::CategoryNotFound(s.to_string()))
    }
}

/// Read-only table from category to feed path.
#[derive(Debug, Clone)]
pub struct FeedResolver {
    paths: HashMap<Category, String>,
}

impl FeedResolver {
    pub fn hatena() -> Self {
        Category::ALL
            .into_iter()
            .map(|category| (category, category.hatena_path().to_string()))
            .collect()
    }

    pub fn resolve(&self, label: &str) -> Result<&str, HotentryError> {
        let category: Category = label.parse()?;
        self.paths
            .get(&category)
            .map(String::as_str)
            .ok_or_else(|| HotentryError::CategoryNotFound(label.to_string()))
    }
}

impl FromIterator<(Category, String)> for FeedResolver {
    fn from_iter<I: IntoIterator<Item = (Category, String)>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
