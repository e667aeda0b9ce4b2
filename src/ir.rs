use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Parent,
    Child,
    Spouse,
    Sibling,
}

impl RelationshipKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "parent" => Some(Self::Parent),
            "child" => Some(Self::Child),
            "spouse" => Some(Self::Spouse),
            "sibling" => Some(Self::Sibling),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Child => "child",
            Self::Spouse => "spouse",
            Self::Sibling => "sibling",
        }
    }

    /// Spouse and sibling edges carry no direction.
    pub fn is_symmetric(self) -> bool {
        matches!(self, Self::Spouse | Self::Sibling)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub avatar_thumb_url: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, first: &str, last: &str) -> Self {
        self.first_name = first.to_string();
        self.last_name = last.to_string();
        self
    }

    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.clone()
        } else {
            name.to_string()
        }
    }

    /// Card image: the thumbnail when the export has one, else the full URL.
    pub fn avatar(&self) -> Option<&str> {
        self.avatar_thumb_url
            .as_deref()
            .or(self.avatar_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    /// "1921 – 1987", "b. 1950" or `None` when no date carries a year.
    pub fn lifespan(&self) -> Option<String> {
        let birth = self.birth_date.as_deref().and_then(year_of);
        let death = self.death_date.as_deref().and_then(year_of);
        match (birth, death) {
            (Some(b), Some(d)) => Some(format!("{b} – {d}")),
            (Some(b), None) => Some(format!("b. {b}")),
            (None, Some(d)) => Some(format!("d. {d}")),
            (None, None) => None,
        }
    }
}

// Dates arrive as ISO strings ("1950-04-12") or bare years.
fn year_of(date: &str) -> Option<&str> {
    let year = date.trim().split(['-', '.', '/']).next()?;
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(id: impl Into<String>, source: &str, target: &str, kind: RelationshipKind) -> Self {
        Self {
            id: id.into(),
            source: source.to_string(),
            target: target.to_string(),
            kind,
        }
    }

    /// `(parent, child)` for parent and child rows, `None` otherwise.
    pub fn parent_child(&self) -> Option<(&str, &str)> {
        match self.kind {
            RelationshipKind::Parent => Some((self.source.as_str(), self.target.as_str())),
            RelationshipKind::Child => Some((self.target.as_str(), self.source.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyGraph {
    pub persons: Vec<Person>,
    pub relationships: Vec<Relationship>,
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, person: Person) {
        self.persons.push(person);
    }

    pub fn relate(&mut self, source: &str, target: &str, kind: RelationshipKind) {
        let id = format!("e{}", self.relationships.len());
        self.relationships
            .push(Relationship::new(id, source, target, kind));
    }

    pub fn add_parent(&mut self, parent: &str, child: &str) {
        self.relate(parent, child, RelationshipKind::Parent);
    }

    pub fn add_spouses(&mut self, a: &str, b: &str) {
        self.relate(a, b, RelationshipKind::Spouse);
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}
