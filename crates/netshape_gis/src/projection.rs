//! Projection lookup.
//!
//! Layers without an embedded code are resolved from their `.prj` sidecar,
//! which holds a WKT description. Turning WKT into an EPSG code is the job of
//! a [`ProjectionLookup`] collaborator.

use crate::error::GisResult;

/// Candidate EPSG codes for a projection description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionMatch {
    /// Candidate codes, best first. Never empty.
    pub codes: Vec<u32>,
    /// True if the description names its code explicitly.
    pub exact: bool,
}

impl ProjectionMatch {
    /// An exact single-code match.
    #[must_use]
    pub fn exact(code: u32) -> Self {
        Self {
            codes: vec![code],
            exact: true,
        }
    }

    /// The code to use: the first candidate.
    #[must_use]
    pub fn best(&self) -> Option<u32> {
        self.codes.first().copied()
    }
}

/// Resolves a WKT projection description to EPSG codes.
pub trait ProjectionLookup: Send + Sync {
    /// Looks `wkt` up. Returns `Ok(None)` if nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GisError::ProjectionLookup`] if the lookup service
    /// itself fails.
    fn lookup(&self, wkt: &str) -> GisResult<Option<ProjectionMatch>>;
}

/// Offline lookup that reads authority clauses out of the WKT.
///
/// `AUTHORITY["EPSG","n"]` (WKT1) and `ID["EPSG",n]` (WKT2) clauses give an
/// exact match. The root object's clause closes the text, so the last clause
/// found wins. Descriptions without a clause fall back to a few well-known
/// names, reported as inexact.
#[derive(Debug, Default, Clone, Copy)]
pub struct WktAuthorityLookup;

impl WktAuthorityLookup {
    /// Creates the lookup.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProjectionLookup for WktAuthorityLookup {
    fn lookup(&self, wkt: &str) -> GisResult<Option<ProjectionMatch>> {
        if let Some(code) = last_authority_code(wkt) {
            return Ok(Some(ProjectionMatch::exact(code)));
        }
        Ok(guess_from_name(wkt))
    }
}

fn quoted(s: &str) -> &str {
    s.trim().trim_matches('"').trim()
}

fn last_authority_code(wkt: &str) -> Option<u32> {
    let upper = wkt.to_ascii_uppercase();
    let mut found = None;
    for keyword in ["AUTHORITY[", "ID["] {
        let mut rest = upper.as_str();
        let mut base = 0;
        while let Some(pos) = rest.find(keyword) {
            let start = pos + keyword.len();
            let clause_at = base + start;
            let body = &rest[start..];
            let Some(end) = body.find(']') else { break };
            let mut parts = body[..end].splitn(2, ',');
            let authority = parts.next().map(quoted);
            let code = parts.next().map(quoted).and_then(|c| c.parse::<u32>().ok());
            if let (Some("EPSG"), Some(code)) = (authority, code) {
                match found {
                    Some((at, _)) if at > clause_at => {}
                    _ => found = Some((clause_at, code)),
                }
            }
            base += start + end;
            rest = &upper[base..];
        }
    }
    found.map(|(_, code)| code)
}

fn root_name(wkt: &str) -> Option<(String, String)> {
    let open = wkt.find('[')?;
    let keyword = wkt[..open].trim().to_ascii_uppercase();
    let body = &wkt[open + 1..];
    let first = body.find('"')?;
    let len = body[first + 1..].find('"')?;
    let name = body[first + 1..first + 1 + len].to_ascii_lowercase();
    Some((keyword, name))
}

fn utm_zone(name: &str) -> Option<(u32, bool)> {
    let normalized = name.replace([' ', '-'], "_");
    let (_, tail) = normalized.split_once("utm_zone_")?;
    let digits: String = tail.chars().take_while(char::is_ascii_digit).collect();
    let zone: u32 = digits.parse().ok()?;
    if !(1..=60).contains(&zone) {
        return None;
    }
    let north = !tail[digits.len()..].starts_with('s');
    Some((zone, north))
}

fn guess_from_name(wkt: &str) -> Option<ProjectionMatch> {
    let (keyword, name) = root_name(wkt)?;
    let wgs84 = name.contains("wgs") && name.contains("84");
    let codes = match keyword.as_str() {
        "GEOGCS" | "GEOGCRS" | "GEODCRS" if wgs84 => vec![4326],
        "GEOGCS" | "GEOGCRS" | "GEODCRS" if name.contains("nad83") || name.contains("nad_1983") => {
            vec![4269]
        }
        "PROJCS" | "PROJCRS" if wgs84 => {
            let (zone, north) = utm_zone(&name)?;
            vec![if north { 32600 + zone } else { 32700 + zone }]
        }
        "PROJCS" | "PROJCRS" if name.contains("pseudo") && name.contains("mercator") => {
            vec![3857, 900_913]
        }
        _ => return None,
    };
    Some(ProjectionMatch {
        codes,
        exact: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTM33: &str = r#"PROJCS["WGS 84 / UTM zone 33N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],AUTHORITY["EPSG","4326"]],PROJECTION["Transverse_Mercator"],AUTHORITY["EPSG","32633"]]"#;

    #[test]
    fn root_authority_wins() {
        let found = WktAuthorityLookup::new().lookup(UTM33).unwrap().unwrap();
        assert_eq!(found, ProjectionMatch::exact(32633));
    }

    #[test]
    fn wkt2_id_clause() {
        let wkt = r#"GEOGCRS["WGS 84",DATUM["World Geodetic System 1984"],ID["EPSG",4326]]"#;
        let found = WktAuthorityLookup::new().lookup(wkt).unwrap().unwrap();
        assert_eq!(found.best(), Some(4326));
        assert!(found.exact);
    }

    #[test]
    fn esri_names_are_inexact() {
        let wkt = r#"PROJCS["WGS_1984_UTM_Zone_36S",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984"]],PROJECTION["Transverse_Mercator"]]"#;
        let found = WktAuthorityLookup::new().lookup(wkt).unwrap().unwrap();
        assert_eq!(found.codes, vec![32736]);
        assert!(!found.exact);

        let geo = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]]]"#;
        assert_eq!(
            WktAuthorityLookup::new().lookup(geo).unwrap().unwrap().best(),
            Some(4326)
        );
    }

    #[test]
    fn unknown_description_is_none() {
        let wkt = r#"LOCAL_CS["site grid",LOCAL_DATUM["none",0]]"#;
        assert!(WktAuthorityLookup::new().lookup(wkt).unwrap().is_none());
        assert!(WktAuthorityLookup::new().lookup("").unwrap().is_none());
    }
}
