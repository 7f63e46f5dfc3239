//! Asset reference parsing.
//!
//! Stored assets are addressed by an opaque, dash-delimited reference string.
//! Images carry their pixel dimensions and encoded format in the reference,
//! files carry only their extension:
//!
//! - `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg` → image, 2000×3000, `jpg`
//! - `file-e3a1c57b0ef7b0ac6e4f88e6fc48a4a2c5e4c7c1-pdf` → file, `pdf`
//!
//! Reference strings come from document content the caller does not control,
//! so parsing never fails loudly: anything that does not match the expected
//! shape yields an [`AssetReference`] with `valid == false` and sentinel
//! fields (empty id and format, zero dimensions).

use std::fmt;

/// Kind of asset a reference points at, taken from its leading segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    File,
    /// Sentinel kind of an unparseable reference.
    Unknown,
}

impl AssetKind {
    fn prefix(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::File => "file",
            AssetKind::Unknown => "",
        }
    }
}

/// Structured form of an asset reference string.
///
/// Immutable once constructed. Build one with [`AssetReference::parse`] for
/// raw references, or [`AssetReference::image`] / [`AssetReference::file`]
/// when the fields are already known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetReference {
    kind: AssetKind,
    id: String,
    width: u32,
    height: u32,
    format: String,
    valid: bool,
}

impl AssetReference {
    /// Parse a raw reference string.
    ///
    /// Accepted shapes:
    /// - `"image-<id>-<W>x<H>-<format>"` (exactly four segments)
    /// - `"file-<id>-<ext>"` (exactly three segments)
    ///
    /// The id must be a non-empty ASCII alphanumeric hash, dimensions two
    /// positive integers joined by a single `x`, and the format a non-empty
    /// lowercase alphanumeric extension.
    pub fn parse(raw: &str) -> Self {
        let segments: Vec<&str> = raw.split('-').collect();
        let parsed = match segments.as_slice() {
            ["image", id, dims, format] => parse_dimensions(dims)
                .filter(|_| is_hash(id) && is_extension(format))
                .map(|(w, h)| Self::image(*id, w, h, *format)),
            ["file", id, ext] if is_hash(id) && is_extension(ext) => Some(Self::file(*id, *ext)),
            _ => None,
        };

        parsed.unwrap_or_else(|| {
            log::debug!("unrecognized asset reference: {raw:?}");
            Self::invalid()
        })
    }

    /// Construct an image reference from known fields.
    pub fn image(id: impl Into<String>, width: u32, height: u32, format: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Image,
            id: id.into(),
            width,
            height,
            format: format.into(),
            valid: true,
        }
    }

    /// Construct a file reference from known fields.
    pub fn file(id: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::File,
            id: id.into(),
            width: 0,
            height: 0,
            format: extension.into(),
            valid: true,
        }
    }

    /// The sentinel value every parse failure produces.
    pub fn invalid() -> Self {
        Self {
            kind: AssetKind::Unknown,
            id: String::new(),
            width: 0,
            height: 0,
            format: String::new(),
            valid: false,
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Lowercase extension: the encoded image format, or the file extension.
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True for a valid image reference, the only kind the image URL
    /// builder accepts.
    pub fn is_image(&self) -> bool {
        self.valid && self.kind == AssetKind::Image
    }

    pub fn is_file(&self) -> bool {
        self.valid && self.kind == AssetKind::File
    }
}

/// Re-derives the reference string. Invalid references render as empty.
impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            _ if !self.valid => Ok(()),
            AssetKind::Image => write!(
                f,
                "{}-{}-{}x{}-{}",
                self.kind.prefix(),
                self.id,
                self.width,
                self.height,
                self.format
            ),
            AssetKind::File => write!(f, "{}-{}-{}", self.kind.prefix(), self.id, self.format),
            AssetKind::Unknown => Ok(()),
        }
    }
}

/// `"2000x3000"` → `(2000, 3000)`. Both sides must be positive integers.
fn parse_dimensions(segment: &str) -> Option<(u32, u32)> {
    let (w, h) = segment.split_once('x')?;
    let width = parse_positive(w)?;
    let height = parse_positive(h)?;
    Some((width, height))
}

fn parse_positive(digits: &str) -> Option<u32> {
    // `u32::from_str` would accept a leading `+`
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

fn is_hash(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn is_extension(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
