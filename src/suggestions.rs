//! # Error Suggestions
//!
//! User-facing errors for the CLI layer. Each one says what went wrong and
//! how to fix it, with one `hint:` line per remedy.
//!
//! ```rust,ignore
//! use mathfonts::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Unknown font family: {}", name);
//!
//! // Use:
//! return Err(suggestions::unknown_family(name, &catalog::names()));
//! ```

use std::path::Path;

/// Unknown family name, with a close match when there is one.
pub fn unknown_family(name: &str, available: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(name, available)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown font family: {name}{did_you_mean}\n\n\
         Available families: {families}\n\
         hint: Run 'mathfonts list' to see every family and its sources",
        families = available.join(", ")
    )
}

/// Required tools or Python modules are missing.
pub fn missing_dependencies(missing: &[String]) -> anyhow::Error {
    let python_hint = if missing.iter().any(|m| m.contains("python module")) {
        "\nhint: Install the converter modules with 'pip install fonttools brotli zopfli'"
    } else {
        ""
    };

    anyhow::anyhow!(
        "Missing dependencies: {missing}\n\n\
         hint: Install the missing tools with your system package manager{python_hint}\n\
         hint: Point MATHFONTS_PYTHON at an interpreter that has fontTools installed",
        missing = missing.join(", ")
    )
}

/// The output directory to package does not exist.
pub fn output_missing(dir: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Output directory not found: {dir}\n\n\
         hint: Run 'mathfonts build-all' first, or check MATHFONTS_DIST_DIR\n\
         hint: Use 'mathfonts release --dry-run' to exercise packaging without a build",
        dir = dir.display()
    )
}

/// An explicit release version is not `MAJOR.MINOR.PATCH`.
pub fn invalid_version(version: &str, error: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid release version: {version}\n\
         error: {error}\n\n\
         hint: Use MAJOR.MINOR.PATCH, optionally prefixed with 'v' (e.g. '1.4.0', 'v1.4.0')\n\
         hint: Omit the version to increment the patch number of the latest tag"
    )
}

/// Some families failed during a build.
pub fn families_failed(failed: &[&str], total: usize) -> anyhow::Error {
    anyhow::anyhow!(
        "{count} of {total} families failed: {names}\n\n\
         hint: Re-run with --log-level debug to see each step\n\
         hint: Rebuild a single family with 'mathfonts build <FAMILY>'",
        count = failed.len(),
        names = failed.join(", ")
    )
}

/// Closest candidate within edit distance 2, compared case-insensitively.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input = input.to_lowercase();
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(&input, &candidate.to_lowercase());
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b_chars.len()]
}
