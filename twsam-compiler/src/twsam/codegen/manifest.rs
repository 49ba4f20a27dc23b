//! Output file naming and the manifest files listing scripts and assets.

use super::assets::AssetList;
use std::collections::HashSet;
use std::path::Path;

/// File names and suffixes used for the generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    pub script_extension: String,
    pub script_list: String,
    pub image_list: String,
    pub music_list: String,
    pub music_suffix: String,
    pub empty_image: String,
    pub empty_music: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        OutputNaming {
            script_extension: "twsam".to_string(),
            script_list: "Script.list.txt".to_string(),
            image_list: "Images.txt".to_string(),
            music_list: "Music.list.txt".to_string(),
            music_suffix: ".epsgmod".to_string(),
            empty_image: "blank".to_string(),
            empty_music: "empty".to_string(),
        }
    }
}

impl OutputNaming {
    /// Script file names for the given titles, in the order given.
    /// See [script_identifiers].
    pub fn script_file_names<'a>(
        &self,
        titles: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        script_identifiers(titles)
            .into_iter()
            .map(|identifier| format!("{}.{}", identifier, self.script_extension))
            .collect()
    }

    /// One script file name per title, in the order given
    pub fn script_manifest<'a>(&self, titles: impl IntoIterator<Item = &'a str>) -> String {
        self.script_file_names(titles)
            .into_iter()
            .map(|name| name + "\n")
            .collect()
    }

    pub fn image_manifest(&self, images: &AssetList) -> String {
        asset_manifest(images, "", &self.empty_image)
    }

    pub fn music_manifest(&self, music: &AssetList) -> String {
        asset_manifest(music, &self.music_suffix, &self.empty_music)
    }
}

/// Replace every character outside `[0-9A-Za-z]` with `_`.
pub fn name_to_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// One distinct identifier per title.
///
/// Titles can map to the same identifier (`Go North` and `Go_North`), and file systems
/// may ignore case. The first title keeps its identifier; a later one that collides,
/// ignoring ASCII case, gets the first free `_2`, `_3`, ... suffix.
pub fn script_identifiers<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let plain: Vec<String> = titles.into_iter().map(name_to_identifier).collect();
    let reserved: HashSet<String> = plain.iter().map(|id| id.to_ascii_lowercase()).collect();
    let mut used = HashSet::with_capacity(plain.len());

    plain
        .into_iter()
        .map(|identifier| {
            if used.insert(identifier.to_ascii_lowercase()) {
                return identifier;
            }
            let free = (2..)
                .map(|n| format!("{}_{}", identifier, n))
                .find(|candidate| {
                    let key = candidate.to_ascii_lowercase();
                    !reserved.contains(&key) && used.insert(key)
                });
            free.unwrap_or(identifier)
        })
        .collect()
}

/// Identifier of an asset: its file stem
pub fn asset_item_name(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    name_to_identifier(&stem)
}

fn asset_manifest(assets: &AssetList, suffix: &str, empty_item: &str) -> String {
    if assets.is_empty() {
        return format!("{}{}\n", empty_item, suffix);
    }
    assets
        .paths()
        .iter()
        .map(|path| format!("{}{}\n", asset_item_name(path), suffix))
        .collect()
}
