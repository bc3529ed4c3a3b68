//! File type tags accepted by the file upload endpoint.

use {
    serde::{Deserialize, Serialize},
    std::{fmt, path::Path, str::FromStr},
};

/// Upload category for non-image files. `Stream` covers anything the
/// service has no dedicated category for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Opus,
    Mp4,
    Pdf,
    Doc,
    Xls,
    Ppt,
    #[default]
    Stream,
}

/// Lower-case extension to tag lookup.
static EXTENSIONS: &[(&str, FileType)] = &[
    ("opus", FileType::Opus),
    ("mp4", FileType::Mp4),
    ("pdf", FileType::Pdf),
    ("doc", FileType::Doc),
    ("docx", FileType::Doc),
    ("xls", FileType::Xls),
    ("xlsx", FileType::Xls),
    ("ppt", FileType::Ppt),
    ("pptx", FileType::Ppt),
];

impl FileType {
    pub const ALL: [Self; 7] = [
        Self::Opus,
        Self::Mp4,
        Self::Pdf,
        Self::Doc,
        Self::Xls,
        Self::Ppt,
        Self::Stream,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opus => "opus",
            Self::Mp4 => "mp4",
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Xls => "xls",
            Self::Ppt => "ppt",
            Self::Stream => "stream",
        }
    }

    /// Audio and video uploads carry a duration on the wire.
    #[must_use]
    pub fn is_media(self) -> bool {
        matches!(self, Self::Opus | Self::Mp4)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown file type '{s}' (expected opus, mp4, pdf, doc, xls, ppt or stream)")
            })
    }
}

/// Infer the upload category from a file name's extension.
///
/// Total: unknown or missing extensions map to [`FileType::Stream`].
#[must_use]
pub fn classify(file_name: &str) -> FileType {
    let Some(ext) = Path::new(file_name).extension().and_then(|e| e.to_str()) else {
        return FileType::Stream;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(FileType::Stream, |(_, tag)| *tag)
}
