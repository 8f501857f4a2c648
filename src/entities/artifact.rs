use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Git,
    Zenodo,
    Other,
}

impl ArtifactKind {
    pub fn from_type(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "git" => Self::Git,
            "zenodo" => Self::Zenodo,
            _ => Self::Other,
        }
    }
}

/// An external link to code, data, or an archival deposit for a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub url: String,
    pub kind: ArtifactKind,
    /// Type string exactly as the catalog spelled it.
    #[serde(rename = "type")]
    pub raw_type: String,
}

impl Artifact {
    pub fn new(url: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        Self {
            url: url.into(),
            kind: ArtifactKind::from_type(&raw_type),
            raw_type,
        }
    }

    /// Label used when a paper has exactly one artifact.
    pub fn inline_label(&self) -> String {
        match self.kind {
            ArtifactKind::Git => "💻 Code (GIT)".to_string(),
            ArtifactKind::Zenodo => "📘 Archive (ZENODO)".to_string(),
            ArtifactKind::Other => format!("📦 Artifact ({})", self.raw_type),
        }
    }

    /// Label used for each entry of the artifact disclosure list.
    pub fn list_label(&self) -> String {
        match self.kind {
            ArtifactKind::Git => "💻 GIT".to_string(),
            ArtifactKind::Zenodo => "📘 ZENODO".to_string(),
            ArtifactKind::Other => self.raw_type.to_uppercase(),
        }
    }
}

/// How a paper's artifacts are presented, by count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactLinks<'a> {
    Hidden,
    Single(&'a Artifact),
    Disclosure(&'a [Artifact]),
}

impl<'a> ArtifactLinks<'a> {
    pub fn from_slice(artifacts: &'a [Artifact]) -> Self {
        match artifacts {
            [] => Self::Hidden,
            [only] => Self::Single(only),
            many => Self::Disclosure(many),
        }
    }
}
