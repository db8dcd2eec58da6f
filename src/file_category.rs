/// Extension-based file categorization.
///
/// This module holds the fixed extension table that drives sorting and the
/// helpers that turn a file path into a [`Category`].
///
/// # Examples
///
/// ```
/// use filesorter::file_category::{Category, classify, classify_path};
/// use std::path::Path;
///
/// assert_eq!(classify("png"), Category::Image);
/// assert_eq!(classify("csv"), Category::Document);
/// assert_eq!(classify_path(Path::new("Report.DOCX")), Category::Document);
/// assert_eq!(classify_path(Path::new("notes")), Category::Other);
/// ```
use std::fmt;
use std::path::Path;

/// The label a file is sorted into.
///
/// Variant order matches the lookup order of [`EXTENSION_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Executable,
    Data,
    Design,
    Presentation,
    Spreadsheet,
    System,
    Torrent,
    /// Anything no table entry claims, including files without an extension.
    Other,
}

impl Category {
    /// Every category, `Other` last.
    pub const ALL: [Category; 13] = [
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Document,
        Category::Archive,
        Category::Executable,
        Category::Data,
        Category::Design,
        Category::Presentation,
        Category::Spreadsheet,
        Category::System,
        Category::Torrent,
        Category::Other,
    ];

    /// Returns the lowercase label of this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Document => "document",
            Category::Archive => "archive",
            Category::Executable => "executable",
            Category::Data => "data",
            Category::Design => "design",
            Category::Presentation => "presentation",
            Category::Spreadsheet => "spreadsheet",
            Category::System => "system",
            Category::Torrent => "torrent",
            Category::Other => "other",
        }
    }

    /// Returns the name of the destination folder for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use filesorter::file_category::Category;
    ///
    /// assert_eq!(Category::Document.folder_name(), "Document");
    /// assert_eq!(Category::Other.folder_name(), "Other");
    /// ```
    pub fn folder_name(&self) -> String {
        title_case(self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered extension table. Lookup returns the first category whose set
/// contains the extension, so the order here decides ambiguous entries
/// such as `csv` (Document, Data, Spreadsheet) or `psd` (Image, Design).
pub const EXTENSION_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Image,
        &[
            "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "svg", "webp", "heic", "heif",
            "ico", "raw", "cr2", "nef", "arw", "psd", "ai", "eps", "indd", "indt", "icns", "jp2",
            "j2k", "jpf", "jpx", "jpm", "dds", "exr", "hdr", "pbm", "pgm", "ppm", "pnm",
        ],
    ),
    (
        Category::Video,
        &[
            "mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp", "m2ts",
            "ts", "mts", "vob", "ogv", "divx", "f4v", "rm", "rmvb", "asf", "avchd", "hevc", "h265",
            "h264", "prores", "dnxhd",
        ],
    ),
    (
        Category::Audio,
        &[
            "mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "opus", "alac", "aiff", "pcm", "dsd",
            "dff", "dsf", "mid", "midi", "amr", "ac3", "mka", "tak", "ape", "cue", "m3u", "m3u8",
            "pls", "xspf",
        ],
    ),
    (
        Category::Document,
        &[
            "pdf", "doc", "docx", "txt", "rtf", "odt", "pages", "xls", "xlsx", "csv", "ods",
            "numbers", "ppt", "pptx", "odp", "key", "md", "tex", "epub", "mobi", "fb2", "djvu",
            "djv", "oxps", "xps", "chm", "hlp", "lit",
        ],
    ),
    (
        Category::Archive,
        &[
            "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "lz", "lzma", "z", "lzh", "arj", "cab",
            "iso", "dmg", "pkg", "rpm", "deb", "cpio", "zst", "lz4", "br", "tgz", "tbz2", "txz",
        ],
    ),
    (
        Category::Executable,
        &[
            "exe", "msi", "bat", "cmd", "sh", "bash", "ps1", "app", "dmg", "pkg", "deb", "rpm",
            "apk", "jar", "ipa", "xap", "msix", "appx", "vb", "vbs", "js", "py", "php", "pl", "rb",
            "go", "java", "class",
        ],
    ),
    (
        Category::Data,
        &[
            "json", "xml", "yaml", "yml", "ini", "cfg", "conf", "toml", "env", "sql", "db",
            "sqlite", "sqlite3", "mdb", "accdb", "dbf", "mdf", "ldf", "log", "dat", "csv", "tsv",
            "ods", "xlsx", "parquet", "avro", "orc", "feather", "hdf5", "h5", "nc", "mat", "sav",
        ],
    ),
    (
        Category::Design,
        &[
            "ai", "eps", "psd", "xd", "fig", "sketch", "afdesign", "afphoto", "afpub", "cdr",
            "dwg", "dxf", "svg", "indd", "indt", "idml", "qxp", "pub", "vsd", "vsdx",
        ],
    ),
    (
        Category::Presentation,
        &[
            "ppt", "pptx", "odp", "key", "pps", "ppsx", "pdf", "swf", "fla", "flv", "prezi",
            "gslides",
        ],
    ),
    (
        Category::Spreadsheet,
        &[
            "xls", "xlsx", "xlsm", "xlsb", "ods", "csv", "tsv", "numbers", "gnumeric", "dif",
            "slk", "qpw", "wk1",
        ],
    ),
    (
        Category::System,
        &[
            "dll", "sys", "drv", "vxd", "ocx", "cpl", "mui", "msc", "scr", "theme",
            "deskthemepack", "diagcab", "diagpkg", "edb", "reg", "regtrans-ms", "blf",
        ],
    ),
    (Category::Torrent, &["torrent", "magnet"]),
];

/// Looks up a normalized extension (lowercase, no leading dot).
///
/// Returns [`Category::Other`] when no table entry contains it, which is
/// always the case for the empty string.
pub fn classify(extension: &str) -> Category {
    EXTENSION_TABLE
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Returns the normalized extension of a file: the text after the last
/// `.` of its name, lowercased. Names without a suffix (including dotfiles
/// such as `.bashrc`) yield an empty string.
pub fn normalized_extension(file_path: &Path) -> String {
    file_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
        .trim_start_matches('.')
        .to_string()
}

/// Determines the category of a file from its name alone.
///
/// Only the final suffix counts: `archive.tar.gz` is classified by `gz`.
pub fn classify_path(file_path: &Path) -> Category {
    classify(&normalized_extension(file_path))
}

/// Capitalizes the first character and lowercases the rest.
pub fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
