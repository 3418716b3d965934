#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Square videos count as horizontal.
    pub fn of(resolution: crate::probe::Resolution) -> Self {
        if resolution.width >= resolution.height {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Horizontal => f.write_str("horizontal"),
            Orientation::Vertical => f.write_str("vertical"),
        }
    }
}

/// One output of the ladder. `label` names the rendition (`720` produces
/// `<name>_720p.<ext>`) and is also the width passed to the scale filter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rung {
    pub label: String,
    pub height: u32,
}

impl Rung {
    pub fn new(label: &str, height: u32) -> Self {
        Self {
            label: label.to_owned(),
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionMap {
    pub horizontal: Vec<Rung>,
    pub vertical: Vec<Rung>,
}

impl Default for ResolutionMap {
    fn default() -> Self {
        Self {
            horizontal: vec![
                Rung::new("720", 720),
                Rung::new("480", 480),
                Rung::new("360", 360),
            ],
            vertical: vec![
                Rung::new("720", 406),
                Rung::new("480", 270),
                Rung::new("360", 202),
            ],
        }
    }
}

impl ResolutionMap {
    pub fn rungs(&self, orientation: Orientation) -> &[Rung] {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let label_pattern = regex::Regex::new(r"\A[0-9]+\z")?;
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let mut seen = std::collections::HashSet::new();
            for rung in self.rungs(orientation) {
                if !label_pattern.is_match(&rung.label) {
                    anyhow::bail!(
                        "resolutions.{}: label {:?} is not a number",
                        orientation,
                        rung.label
                    );
                }
                if rung.height == 0 {
                    anyhow::bail!(
                        "resolutions.{}: height of {}p must be positive",
                        orientation,
                        rung.label
                    );
                }
                if !seen.insert(rung.label.as_str()) {
                    anyhow::bail!(
                        "resolutions.{}: duplicate label {}",
                        orientation,
                        rung.label
                    );
                }
            }
        }
        Ok(())
    }
}
