use super::model::ViolationSet;

/// Prefix for freshly uploaded, unprocessed artifacts.
pub const RAW_PREFIX: &str = "uploads_raw/";
/// Prefix for finalized artifacts served to players.
pub const PUBLISHED_PREFIX: &str = "rehab_videos/";

/// Exercise videos longer than this are blocked.
pub const MAX_DURATION_SEC: f64 = 120.0;
/// Source videos taller than this are blocked.
pub const MAX_HEIGHT_PX: i32 = 720;

/// Marker embedded in intake file names, e.g. `uploads_raw/ex-abc123-take1.mp4`.
const ID_MARKER: &str = "ex-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeNamespace {
    Raw,
    Published,
}

/// Namespace gate: anything outside the two recognized prefixes is not ours.
pub fn intake_namespace(object_name: &str) -> Option<IntakeNamespace> {
    if object_name.starts_with(RAW_PREFIX) {
        Some(IntakeNamespace::Raw)
    } else if object_name.starts_with(PUBLISHED_PREFIX) {
        Some(IntakeNamespace::Published)
    } else {
        None
    }
}

/// Extracts the job id from the `ex-<id>` token in the object's base name.
/// Unparseable names are expected (other objects share the bucket) and yield
/// None rather than an error.
pub fn parse_job_id(object_name: &str) -> Option<String> {
    let base = object_name.rsplit('/').next()?;
    let rest = base.split_once(ID_MARKER)?.1;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    if id.is_empty() { None } else { Some(id) }
}

/// Deterministic destination for a raw source object: swap the intake prefix
/// for the published one and force an .mp4 extension. Pure, so retries of the
/// same source always converge on the same destination.
pub fn dest_path(source_path: &str) -> String {
    let relative = source_path.strip_prefix(RAW_PREFIX).unwrap_or(source_path);
    let stem = match relative.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => relative,
    };
    format!("{}{}.mp4", PUBLISHED_PREFIX, stem)
}

pub fn extension(object_name: &str) -> &str {
    object_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Pure policy check over the observed metadata. All rules evaluate
/// independently; callers derive blocking from the returned set.
pub fn validate(
    duration_sec: Option<f64>,
    height_px: Option<i32>,
    source_extension: &str,
) -> ViolationSet {
    let ext = source_extension.trim_start_matches('.').to_ascii_lowercase();

    ViolationSet {
        over_duration: duration_sec.is_some_and(|d| d > MAX_DURATION_SEC),
        over_resolution: height_px.is_some_and(|h| h > MAX_HEIGHT_PX),
        mov_format: matches!(ext.as_str(), "mov" | "qt"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_duration_blocks() {
        let v = validate(Some(130.0), Some(480), ".mp4");
        assert!(v.over_duration);
        assert!(!v.over_resolution);
        assert!(!v.mov_format);
        assert!(v.blocked());
    }

    #[test]
    fn over_resolution_blocks() {
        let v = validate(Some(60.0), Some(1080), ".mp4");
        assert!(!v.over_duration);
        assert!(v.over_resolution);
        assert!(v.blocked());
    }

    #[test]
    fn mov_alone_warns_without_blocking() {
        let v = validate(Some(60.0), Some(480), ".mov");
        assert!(v.mov_format);
        assert!(!v.blocked());
        assert!(!v.is_empty());
    }

    #[test]
    fn clean_metadata_yields_empty_set() {
        let v = validate(Some(60.0), Some(480), ".mp4");
        assert!(v.is_empty());
    }

    #[test]
    fn missing_observations_do_not_violate() {
        let v = validate(None, None, "mp4");
        assert!(v.is_empty());
    }

    #[test]
    fn boundary_values_are_allowed() {
        let v = validate(Some(120.0), Some(720), "mp4");
        assert!(v.is_empty());
    }

    #[test]
    fn quicktime_extensions_case_insensitive() {
        assert!(validate(None, None, "MOV").mov_format);
        assert!(validate(None, None, "qt").mov_format);
        assert!(!validate(None, None, "mp4").mov_format);
    }

    #[test]
    fn namespace_gate() {
        assert_eq!(intake_namespace("uploads_raw/ex-a.mp4"), Some(IntakeNamespace::Raw));
        assert_eq!(
            intake_namespace("rehab_videos/ex-a.mp4"),
            Some(IntakeNamespace::Published)
        );
        assert_eq!(intake_namespace("thumbnails/ex-a.jpg"), None);
        assert_eq!(intake_namespace("ex-a.mp4"), None);
    }

    #[test]
    fn parses_job_id_from_marker() {
        assert_eq!(
            parse_job_id("uploads_raw/ex-abc123-take1.mp4"),
            Some("abc123".to_string())
        );
        assert_eq!(parse_job_id("uploads_raw/ex-xyz.mp4"), Some("xyz".to_string()));
        assert_eq!(parse_job_id("uploads_raw/intro.mp4"), None);
        assert_eq!(parse_job_id("uploads_raw/ex-.mp4"), None);
    }

    #[test]
    fn dest_path_is_deterministic() {
        let a = dest_path("uploads_raw/ex-abc123-take1.mp4");
        let b = dest_path("uploads_raw/ex-abc123-take1.mp4");
        assert_eq!(a, b);
        assert_eq!(a, "rehab_videos/ex-abc123-take1.mp4");
    }

    #[test]
    fn dest_path_forces_mp4() {
        assert_eq!(
            dest_path("uploads_raw/ex-abc123-take1.mov"),
            "rehab_videos/ex-abc123-take1.mp4"
        );
    }
}
