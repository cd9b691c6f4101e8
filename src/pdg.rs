//! PDG visualization map.
//!
//! Builds the particle colour and name lookup used to style MC tracks from
//! a flat reference file of the form:
//!
//! ```text
//! CATEGORY LEPTONS
//! e- 11
//! nu(e) 12
//! CATEGORY LIGHT I=1 MESONS
//! pi+ 211
//! ```
//!
//! Every data line produces an entry for the code and one for its negation
//! (the antiparticle, whose name gets a `~` prefix).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::PdgMapError;

/// Colour used for unknown categories and unmapped codes.
pub const FALLBACK_COLOR: &str = "#999999";

/// Prefix that marks a category line.
const CATEGORY_MARKER: &str = "CATEGORY";

/// Category colours for particles (positive codes).
const BASE_COLORS: &[(&str, &str)] = &[
    ("QUARKS", "#7209b7"),                 // Deep purple
    ("LEPTONS", "#e63946"),                // Bright red
    ("GAUGE AND HIGGS BOSONS", "#ffba08"), // Bright yellow
    ("DIQUARKS", "#f4a261"),               // Warm orange
    ("LIGHT I=1 MESONS", "#f77f00"),       // Vibrant orange
    ("LIGHT I=0 MESONS", "#073b4c"),       // Dark teal
    ("STRANGE MESONS", "#a8dadc"),         // Soft blue
    ("CHARMED MESONS", "#457b9d"),         // Muted blue
    ("BOTTOM MESONS", "#1d3557"),          // Navy blue
    ("CC MESONS", "#f15bb5"),              // Pink
    ("BB MESONS", "#ef476f"),              // Coral red
    ("STRANGE BARYONS", "#06d6a0"),        // Bright teal
    ("CHARMED BARYONS", "#118ab2"),        // Medium blue
    ("BOTTOM BARYONS", "#2a9d8f"),         // Teal green
];

/// Category colours for antiparticles (negated codes).
///
/// Only leptons differ, so positrons and electrons are told apart at a glance.
const ANTI_COLORS: &[(&str, &str)] = &[
    ("QUARKS", "#7209b7"),
    ("LEPTONS", "#11beff"), // Sky blue
    ("GAUGE AND HIGGS BOSONS", "#ffba08"),
    ("DIQUARKS", "#f4a261"),
    ("LIGHT I=1 MESONS", "#f77f00"),
    ("LIGHT I=0 MESONS", "#073b4c"),
    ("STRANGE MESONS", "#a8dadc"),
    ("CHARMED MESONS", "#457b9d"),
    ("BOTTOM MESONS", "#1d3557"),
    ("CC MESONS", "#f15bb5"),
    ("BB MESONS", "#ef476f"),
    ("STRANGE BARYONS", "#06d6a0"),
    ("CHARMED BARYONS", "#118ab2"),
    ("BOTTOM BARYONS", "#2a9d8f"),
];

fn lookup(table: &[(&str, &'static str)], category: Option<&str>) -> &'static str {
    category
        .and_then(|c| table.iter().find(|(name, _)| *name == c))
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Colour and display name for every known PDG code.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdgVisMap {
    /// Hex colour string (`#rrggbb`) per code.
    pub color: HashMap<i32, String>,
    /// Display name per code. Antiparticles are prefixed with `~`.
    pub particle_name: HashMap<i32, String>,
}

impl PdgVisMap {
    /// Read and parse a PDG reference file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PdgMapError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse a PDG reference file from any buffered reader.
    pub fn parse(reader: impl BufRead) -> Result<Self, PdgMapError> {
        let mut map = PdgVisMap::default();
        let mut current_category: Option<String> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with(CATEGORY_MARKER) {
                let parts: Vec<&str> = line.split_whitespace().skip(1).collect();
                current_category = Some(parts.join(" "));
                continue;
            }

            if !line.ends_with(|c: char| c.is_ascii_digit()) {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                continue;
            }

            let (name_parts, code_token) = parts.split_at(parts.len() - 1);
            let code_token = code_token[0];
            let code: i32 = code_token.parse().map_err(|source| PdgMapError::BadCode {
                line: idx + 1,
                token: code_token.to_string(),
                source,
            })?;
            let anti_code = code.checked_neg().ok_or(PdgMapError::CodeOutOfRange {
                line: idx + 1,
                code,
            })?;
            let name = name_parts.join(" ");

            let category = current_category.as_deref();
            map.insert(code, lookup(BASE_COLORS, category), name.clone());
            map.insert(anti_code, lookup(ANTI_COLORS, category), format!("~{}", name));
        }

        log::debug!("PDG map built with {} codes", map.len());
        Ok(map)
    }

    fn insert(&mut self, code: i32, color: &str, name: String) {
        self.color.insert(code, color.to_string());
        self.particle_name.insert(code, name);
    }

    /// Colour for `code`, or [`FALLBACK_COLOR`] when the code is unknown.
    pub fn color(&self, code: i32) -> &str {
        self.color.get(&code).map(String::as_str).unwrap_or(FALLBACK_COLOR)
    }

    /// Display name for `code`, if known.
    pub fn name(&self, code: i32) -> Option<&str> {
        self.particle_name.get(&code).map(String::as_str)
    }

    /// Number of codes in the map (particles and antiparticles).
    pub fn len(&self) -> usize {
        self.color.len()
    }

    /// True when no codes were parsed.
    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
    }
}
