use phf::{Map, phf_map};

/// Radius used for element symbols missing from [`VDW_RADII`].
pub const DEFAULT_VDW_RADIUS: f32 = 1.8;

/// Van der Waals radii in angstrom (Bondi 1964, Mantina 2009 for the gaps).
#[rustfmt::skip]
static VDW_RADII: Map<&'static str, f32> = phf_map! {
    "H"  => 1.10, "HE" => 1.40,
    "LI" => 1.82, "BE" => 1.53, "B"  => 1.92, "C"  => 1.70, "N"  => 1.55,
    "O"  => 1.52, "F"  => 1.47, "NE" => 1.54,
    "NA" => 2.27, "MG" => 1.73, "AL" => 1.84, "SI" => 2.10, "P"  => 1.80,
    "S"  => 1.80, "CL" => 1.75, "AR" => 1.88,
    "K"  => 2.75, "CA" => 2.31, "NI" => 1.63, "CU" => 1.40, "ZN" => 1.39,
    "GA" => 1.87, "GE" => 2.11, "AS" => 1.85, "SE" => 1.90, "BR" => 1.85,
    "KR" => 2.02,
    "RB" => 3.03, "SR" => 2.49, "PD" => 1.63, "AG" => 1.72, "CD" => 1.58,
    "IN" => 1.93, "SN" => 2.17, "SB" => 2.06, "TE" => 2.06, "I"  => 1.98,
    "XE" => 2.16,
    "CS" => 3.43, "BA" => 2.68, "PT" => 1.75, "AU" => 1.66, "HG" => 1.55,
    "TL" => 1.96, "PB" => 2.02, "BI" => 2.07,
};

/// Looks up the van der Waals radius of an element symbol, ignoring case.
pub fn vdw_radius(symbol: &str) -> Option<f32> {
    let symbol = symbol.trim();
    if symbol.len() > 2 {
        return None;
    }
    VDW_RADII.get(symbol.to_ascii_uppercase().as_str()).copied()
}

/// Like [`vdw_radius`], falling back to [`DEFAULT_VDW_RADIUS`].
pub fn vdw_radius_or_default(symbol: &str) -> f32 {
    vdw_radius(symbol).unwrap_or(DEFAULT_VDW_RADIUS)
}
