//! The closed set of assessment categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Behavioral,
    Psychological,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 3] = [Self::Technical, Self::Behavioral, Self::Psychological];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
            Self::Psychological => "psychological",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category string outside the closed set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown category '{0}'. Supported: technical, behavioral, psychological")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(Self::Technical),
            "behavioral" => Ok(Self::Behavioral),
            "psychological" => Ok(Self::Psychological),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// A value per category, used for weights, scores, and answer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    #[serde(default)]
    pub technical: T,
    #[serde(default)]
    pub behavioral: T,
    #[serde(default)]
    pub psychological: T,
}

impl<T> PerCategory<T> {
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            technical: value.clone(),
            behavioral: value.clone(),
            psychological: value,
        }
    }

    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Technical => &self.technical,
            Category::Behavioral => &self.behavioral,
            Category::Psychological => &self.psychological,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Technical => &mut self.technical,
            Category::Behavioral => &mut self.behavioral,
            Category::Psychological => &mut self.psychological,
        }
    }

    /// Iterate `(category, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_categories() {
        assert_eq!("technical".parse::<Category>(), Ok(Category::Technical));
        assert_eq!("behavioral".parse::<Category>(), Ok(Category::Behavioral));
        assert_eq!(
            "psychological".parse::<Category>(),
            Ok(Category::Psychological)
        );
    }

    #[test]
    fn rejects_unknown_category() {
        let err = "background".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("background".to_string()));
        assert!(err.to_string().contains("background"));
    }

    #[test]
    fn category_is_case_sensitive() {
        assert!("Technical".parse::<Category>().is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_value(Category::Psychological).unwrap();
        assert_eq!(json, "psychological");
    }

    #[test]
    fn per_category_iterates_in_canonical_order() {
        let counts = PerCategory {
            technical: 1,
            behavioral: 2,
            psychological: 3,
        };
        let pairs: Vec<_> = counts.iter().map(|(c, v)| (c, *v)).collect();
        assert_eq!(
            pairs,
            vec![
                (Category::Technical, 1),
                (Category::Behavioral, 2),
                (Category::Psychological, 3)
            ]
        );
    }
}
