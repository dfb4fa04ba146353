//! # Font Family Catalog
//!
//! The fixed list of math font families this tool knows how to build. Each
//! entry names the upstream resources to download and, for families whose
//! upstream does not ship a usable license file, the metadata used to fill
//! the SIL Open Font License template.
//!
//! Family names double as directory names under the staging and output
//! trees, so they are restricted to ASCII letters, digits, `-` and `_`.

use serde::Serialize;

use crate::error::{Error, Result};

/// Values substituted into the Open Font License template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LicenseTemplate {
    /// Copyright date or date range, e.g. `2007` or `2018-2024`.
    pub dates: &'static str,
    /// Copyright holder.
    pub holder: &'static str,
    /// Reserved Font Name.
    pub reserved_font_name: &'static str,
}

/// One buildable font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FamilySpec {
    /// Unique name, also used as a path segment.
    pub name: &'static str,
    /// Upstream resources, fetched concurrently.
    pub urls: &'static [&'static str],
    /// Set when the canonical license is generated from the OFL template.
    pub license_template: Option<LicenseTemplate>,
}

impl FamilySpec {
    /// Check that the name is usable as a single path segment.
    pub fn validate(&self) -> Result<()> {
        validate_family_name(self.name)
    }
}

/// Every family known to the build, in build order.
pub static CATALOG: &[FamilySpec] = &[
    FamilySpec {
        name: "Asana",
        urls: &["https://mirrors.ctan.org/fonts/Asana-Math/ASANA.TTF"],
        license_template: Some(LicenseTemplate {
            dates: "2007-2019",
            holder: "Apostolos Syropoulos",
            reserved_font_name: "Asana Math",
        }),
    },
    FamilySpec {
        name: "DejaVu",
        urls: &[
            "https://github.com/dejavu-fonts/dejavu-fonts/releases/download/version_2_37/dejavu-fonts-ttf-2.37.tar.bz2",
            "https://www.gust.org.pl/projects/e-foundry/tg-math/download/texgyredejavu-math-1_106.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "Fira",
        urls: &[
            "https://github.com/firamath/firamath/releases/download/v0.3.4/FiraMath-Regular.otf",
            "https://github.com/mozilla/Fira/archive/4.202.zip",
            "https://raw.githubusercontent.com/firamath/firamath/master/LICENSE",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "Garamond",
        urls: &[
            "https://github.com/YuanshengZhao/Garamond-Math/raw/master/Garamond-Math.otf",
            "https://github.com/octaviopardo/EBGaramond12/archive/refs/heads/master.zip",
        ],
        license_template: Some(LicenseTemplate {
            dates: "2019-2022",
            holder: "Yuansheng Zhao",
            reserved_font_name: "Garamond-Math",
        }),
    },
    FamilySpec {
        name: "GFS_NeoHellenic",
        urls: &[
            "https://www.greekfontsociety-gfs.gr/_assets/fonts/GFS_NeoHellenic.zip",
            "https://mirrors.ctan.org/fonts/gfsneohellenicmath.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "LatinModern",
        urls: &[
            "https://www.gust.org.pl/projects/e-foundry/latin-modern/download/lm2.004otf.zip",
            "https://www.gust.org.pl/projects/e-foundry/lm-math/download/latinmodern-math-1959.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "Libertinus",
        urls: &["https://github.com/alerque/libertinus/releases/download/v7.040/Libertinus-7.040.zip"],
        license_template: None,
    },
    FamilySpec {
        name: "NewComputerModern",
        urls: &["https://mirrors.ctan.org/fonts/newcomputermodern.zip"],
        license_template: None,
    },
    FamilySpec {
        name: "Noto",
        urls: &[
            "https://github.com/notofonts/math/releases/download/NotoSansMath-v3.000/NotoSansMath-v3.000.zip",
            "https://github.com/notofonts/latin-greek-cyrillic/releases/download/NotoSans-v2.013/NotoSans-v2.013.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "STIX",
        urls: &["https://github.com/stipub/stixfonts/raw/master/zipfiles/STIX2_13-all.zip"],
        license_template: None,
    },
    FamilySpec {
        name: "TeXGyreBonum",
        urls: &[
            "https://www.gust.org.pl/projects/e-foundry/tex-gyre/bonum/qbk2.004otf.zip",
            "https://www.gust.org.pl/projects/e-foundry/tg-math/download/texgyrebonum-math-1005.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "TeXGyrePagella",
        urls: &[
            "https://www.gust.org.pl/projects/e-foundry/tex-gyre/pagella/qpl2_501otf.zip",
            "https://www.gust.org.pl/projects/e-foundry/tg-math/download/texgyrepagella-math-1632.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "TeXGyreSchola",
        urls: &[
            "https://www.gust.org.pl/projects/e-foundry/tex-gyre/schola/qcs2.005otf.zip",
            "https://www.gust.org.pl/projects/e-foundry/tg-math/download/texgyreschola-math-1533.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "TeXGyreTermes",
        urls: &[
            "https://www.gust.org.pl/projects/e-foundry/tex-gyre/termes/qtm2.004otf.zip",
            "https://www.gust.org.pl/projects/e-foundry/tg-math/download/texgyretermes-math-1543.zip",
        ],
        license_template: None,
    },
    FamilySpec {
        name: "XITS",
        urls: &["https://github.com/aliftype/xits/releases/download/v1.302/XITS-1.302.zip"],
        license_template: None,
    },
];

/// Look up a family by exact name.
pub fn find(name: &str) -> Result<&'static FamilySpec> {
    CATALOG
        .iter()
        .find(|family| family.name == name)
        .ok_or_else(|| Error::UnknownFamily {
            name: name.to_string(),
            available: names().join(", "),
        })
}

/// Resolve a list of names, preserving order and dropping duplicates.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static FamilySpec>> {
    let mut selected: Vec<&'static FamilySpec> = Vec::new();
    for name in names {
        let family = find(name.as_ref())?;
        if !selected.iter().any(|f| f.name == family.name) {
            selected.push(family);
        }
    }
    Ok(selected)
}

/// All family names in catalog order.
pub fn names() -> Vec<&'static str> {
    CATALOG.iter().map(|family| family.name).collect()
}

/// Reject names that would escape or nest inside the staging/output trees.
pub fn validate_family_name(name: &str) -> Result<()> {
    let invalid = |message: &str| Error::InvalidFamilyName {
        name: name.to_string(),
        message: message.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.starts_with('.') || name.starts_with('-') {
        return Err(invalid("name must start with a letter, digit or '_'"));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(&format!("character '{}' is not allowed", ch)));
    }
    Ok(())
}
