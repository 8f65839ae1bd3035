//! Format constants and application defaults.

use std::time::Duration;

/// Envelope format version written by this build ("major.minor.revision").
/// Each component must fit in one byte.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Extension given to protected files that are not disguised.
pub const FILE_EXTENSION: &str = "cph";

/// Default PBKDF2 iteration count. Encode and decode must agree on it.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Minimum / maximum password length (characters).
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 127;

/// Maximum total size of the source and disguise files together.
pub const MAX_FILES_SIZE_MB: usize = 10;
pub const MAX_FILES_SIZE_BYTES: usize = MAX_FILES_SIZE_MB * 1024 * 1024;

/// Bytes reserved for the name / extension length prefixes in the payload.
pub const FILE_NAME_SIZE_SIZE_BYTES: u32 = 2;
pub const FILE_EXTENSION_SIZE_SIZE_BYTES: u32 = 2;

/// Maximum name / extension length in characters (UTF-8, up to 4 bytes each).
pub const FILE_NAME_MAX_LENGTH: usize = (1usize << (8 * FILE_NAME_SIZE_SIZE_BYTES)) / 4 - 1;
pub const FILE_EXTENSION_MAX_LENGTH: usize =
    (1usize << (8 * FILE_EXTENSION_SIZE_SIZE_BYTES)) / 4 - 1;

/// Hard bound on one crypto worker round trip.
pub const CRYPTO_TIMEOUT: Duration = Duration::from_secs(30);
/// Soft bound on waiting for moderation results.
pub const MODERATION_TIMEOUT: Duration = Duration::from_secs(60);
/// Minimum duration of a processing call, so fast operations don't flash.
pub const MIN_PROCESS_DURATION: Duration = Duration::from_secs(1);

/// Classifier input edge length (pixels).
pub const MAX_IMAGE_SIZE: u32 = 224;
/// Probability at or above which a forbidden label marks content unsafe.
pub const THRESHOLD: f32 = 0.5;
/// Labels that must not be present in uploaded images.
pub const FORBIDDEN_CLASSES: &[&str] = &["Porn", "Hentai"];

/// Executable and container formats that may not be protected.
pub const FORBIDDEN_FILE_EXTENSIONS: &[&str] = &[
    // Windows executables & system files
    "exe", "msi", "msp", "dll", "sys", "scr", "cpl", "drv",
    // Windows script-based executables
    "bat", "cmd", "ps1", "psm1", "vbs", "vbe", "js", "jse", "wsf", "wsh",
    // macOS executables & installers
    "app", "pkg", "dmg", "command",
    // Linux / Unix executables
    "elf", "bin", "run", "out", "so",
    // Java & cross-platform executables
    "jar", "jnlp",
    // Mobile / embedded
    "apk", "aab", "ipa",
    // Firmware / low-level binaries
    "img", "iso", "rom",
    // Archives & compressed containers
    "zip", "rar", "7z", "tar",
    "gz", "tgz", "bz2", "xz", "lz", "lzma", "zst",
    "cab", "arj", "ace", "sit", "sitx",
    "cpio", "deb", "rpm",
    // Legacy / uncommon but dangerous
    "pif", "gadget",
];

/// Host formats that tolerate trailing bytes and may serve as a disguise.
pub const ALLOWED_DISGUISE_EXTENSIONS: &[&str] = &[
    // Audio
    "mp3", "wav", "flac", "ogg", "oga", "opus", "aac", "m4a", "aiff", "alac",
    // Video
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "flv", "ogv",
    // Images
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "ico", "heic",
    // Documents
    "rtf", "tex", "latex", "epub", "djvu", "pdf",
    // Scientific & structured binary data
    "dat", "raw", "npy", "npz", "mat", "hdf5", "h5", "parquet", "avro",
    // Databases & dumps
    "sqlite", "db", "db3", "sqlitedb", "dump",
    // Archives tolerant to trailing bytes
    "tar", "gz", "tgz", "bz2", "xz", "lz", "lzma", "zst",
    // Capture & trace formats
    "pcap", "pcapng",
    // Other non-executable binaries
    "wasm", "swf",
];
