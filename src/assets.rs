//! Content-hashed shared assets.
//!
//! Every project page links the same stylesheet and favicon. Publishing them
//! under a name derived from their bytes lets a server cache them forever:
//! a content change produces a new name, and the pages built in the same run
//! point at it.
//!
//! The digest is SHA-256; the published name keeps its last
//! [`HASH_SUFFIX_LEN`] hex characters.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{AssembleError, Result};

/// Number of trailing hex characters of the digest used in names.
pub const HASH_SUFFIX_LEN: usize = 8;

/// Short content hash of `bytes`.
pub fn hash_suffix(bytes: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    digest[digest.len() - HASH_SUFFIX_LEN..].to_string()
}

/// How the original file stem is treated in the hashed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashedNaming {
    /// `<hash>.<ext>`
    HashOnly,
    /// `<stem>.<hash>.<ext>`
    KeepStem,
}

/// Derive the published name for an asset called `file_name` with content `bytes`.
pub fn hashed_file_name(file_name: &str, bytes: &[u8], naming: HashedNaming) -> String {
    let hash = hash_suffix(bytes);
    let path = Path::new(file_name);
    let stem = path.file_stem().map(|s| s.to_string_lossy());
    let ext = path.extension().map(|e| e.to_string_lossy());

    match (naming, stem, ext) {
        (HashedNaming::HashOnly, _, Some(ext)) => format!("{}.{}", hash, ext),
        (HashedNaming::HashOnly, _, None) => hash,
        (HashedNaming::KeepStem, Some(stem), Some(ext)) => format!("{}.{}.{}", stem, hash, ext),
        (HashedNaming::KeepStem, Some(stem), None) => format!("{}.{}", stem, hash),
        (HashedNaming::KeepStem, None, _) => hash,
    }
}

/// A shared asset copied into the output root under its hashed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedAsset {
    pub file_name: String,
}

/// Read `source`, hash it, and write it to `output_root` under its hashed name.
///
/// A missing source is [`AssembleError::SharedAssetMissing`].
pub fn publish_hashed(source: &Path, output_root: &Path, naming: HashedNaming) -> Result<HashedAsset> {
    if !source.is_file() {
        return Err(AssembleError::SharedAssetMissing(source.to_path_buf()));
    }

    let bytes = std::fs::read(source).map_err(|e| AssembleError::io(source, e))?;
    let original = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = hashed_file_name(&original, &bytes, naming);

    let dest = output_root.join(&file_name);
    std::fs::write(&dest, &bytes).map_err(|e| AssembleError::io(&dest, e))?;

    tracing::info!(source = %source.display(), name = %file_name, "Published shared asset");

    Ok(HashedAsset { file_name })
}

/// The hashed shared assets of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedAssets {
    pub stylesheet: HashedAsset,
    pub favicon: HashedAsset,
}

impl SharedAssets {
    /// Publish the stylesheet as `<hash>.css` and the favicon as
    /// `<stem>.<hash>.<ext>`.
    pub fn publish(stylesheet: &Path, favicon: &Path, output_root: &Path) -> Result<Self> {
        Ok(Self {
            stylesheet: publish_hashed(stylesheet, output_root, HashedNaming::HashOnly)?,
            favicon: publish_hashed(favicon, output_root, HashedNaming::KeepStem)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_hash_suffix_is_deterministic() {
        let css = b".layout-header { display: flex; }";
        assert_eq!(hash_suffix(css), hash_suffix(css));
        assert_eq!(hash_suffix(css).len(), HASH_SUFFIX_LEN);
    }

    #[test]
    fn test_hash_suffix_is_lowercase_hex() {
        let suffix = hash_suffix(b"anything");
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_suffix_known_value() {
        // sha256("") = e3b0c442...7852b855
        assert_eq!(hash_suffix(b""), "7852b855");
    }

    #[test]
    fn test_different_content_gets_different_names() {
        let corpus: [&[u8]; 5] = [
            b"body { color: red; }",
            b"body { color: blue; }",
            b"body { color: red; } ",
            b"",
            b"<svg></svg>",
        ];
        let names: std::collections::HashSet<String> = corpus
            .iter()
            .map(|c| hashed_file_name("layout.css", c, HashedNaming::HashOnly))
            .collect();
        assert_eq!(names.len(), corpus.len());
    }

    #[test]
    fn test_hashed_file_name_hash_only() {
        let name = hashed_file_name("layout.css", b"x", HashedNaming::HashOnly);
        assert_eq!(name, format!("{}.css", hash_suffix(b"x")));
    }

    #[test]
    fn test_hashed_file_name_keep_stem() {
        let name = hashed_file_name("favicon.svg", b"<svg/>", HashedNaming::KeepStem);
        assert_eq!(name, format!("favicon.{}.svg", hash_suffix(b"<svg/>")));
    }

    #[test]
    fn test_hashed_file_name_without_extension() {
        let name = hashed_file_name("LICENSE", b"x", HashedNaming::KeepStem);
        assert_eq!(name, format!("LICENSE.{}", hash_suffix(b"x")));
    }

    #[test]
    fn test_publish_writes_hashed_copy() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("layout.css");
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(&src, "main { margin: 0 }").unwrap();

        let asset = publish_hashed(&src, &out, HashedNaming::HashOnly).unwrap();

        let written = fs::read_to_string(out.join(&asset.file_name)).unwrap();
        assert_eq!(written, "main { margin: 0 }");
        assert!(asset.file_name.ends_with(".css"));
    }

    #[test]
    fn test_publish_missing_source() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("layout.css");

        let err = publish_hashed(&missing, tmp.path(), HashedNaming::HashOnly).unwrap_err();
        match err {
            AssembleError::SharedAssetMissing(path) => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_shared_assets_publish() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("layout.css"), "a{}").unwrap();
        fs::write(tmp.path().join("favicon.svg"), "<svg/>").unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();

        let assets = SharedAssets::publish(
            &tmp.path().join("layout.css"),
            &tmp.path().join("favicon.svg"),
            &out,
        )
        .unwrap();

        assert_eq!(assets.stylesheet.file_name, format!("{}.css", hash_suffix(b"a{}")));
        assert_eq!(
            assets.favicon.file_name,
            format!("favicon.{}.svg", hash_suffix(b"<svg/>"))
        );
        assert!(out.join(&assets.favicon.file_name).is_file());
    }
}
