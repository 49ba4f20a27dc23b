use serde::Serialize;

/// Asset paths numbered in first-seen order. Interning a path twice returns the same
/// number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetList {
    paths: Vec<String>,
}

impl AssetList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, path: &str) -> usize {
        if let Some(pos) = self.paths.iter().position(|p| p == path) {
            return pos;
        }
        self.paths.push(path.to_string());
        self.paths.len() - 1
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut images = AssetList::new();
        assert_eq!(images.intern("cave.png"), 0);
        assert_eq!(images.intern("sea.png"), 1);
        assert_eq!(images.intern("cave.png"), 0);
        assert_eq!(images.paths(), ["cave.png".to_string(), "sea.png".to_string()]);
    }
}
