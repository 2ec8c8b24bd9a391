//! Element subset covering drug-like molecules.

/// Elements the parser accepts. Anything else is rejected as an invalid
/// descriptor rather than silently mapped to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Hydrogen,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Sodium,
    Magnesium,
    Phosphorus,
    Sulfur,
    Chlorine,
    Potassium,
    Calcium,
    Iron,
    Zinc,
    Selenium,
    Bromine,
    Iodine,
}

impl Element {
    pub fn from_symbol(sym: &str) -> Option<Self> {
        Some(match sym {
            "H" => Element::Hydrogen,
            "B" => Element::Boron,
            "C" => Element::Carbon,
            "N" => Element::Nitrogen,
            "O" => Element::Oxygen,
            "F" => Element::Fluorine,
            "Na" => Element::Sodium,
            "Mg" => Element::Magnesium,
            "P" => Element::Phosphorus,
            "S" => Element::Sulfur,
            "Cl" => Element::Chlorine,
            "K" => Element::Potassium,
            "Ca" => Element::Calcium,
            "Fe" => Element::Iron,
            "Zn" => Element::Zinc,
            "Se" => Element::Selenium,
            "Br" => Element::Bromine,
            "I" => Element::Iodine,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Hydrogen => "H",
            Element::Boron => "B",
            Element::Carbon => "C",
            Element::Nitrogen => "N",
            Element::Oxygen => "O",
            Element::Fluorine => "F",
            Element::Sodium => "Na",
            Element::Magnesium => "Mg",
            Element::Phosphorus => "P",
            Element::Sulfur => "S",
            Element::Chlorine => "Cl",
            Element::Potassium => "K",
            Element::Calcium => "Ca",
            Element::Iron => "Fe",
            Element::Zinc => "Zn",
            Element::Selenium => "Se",
            Element::Bromine => "Br",
            Element::Iodine => "I",
        }
    }

    pub fn atomic_number(&self) -> u8 {
        match self {
            Element::Hydrogen => 1,
            Element::Boron => 5,
            Element::Carbon => 6,
            Element::Nitrogen => 7,
            Element::Oxygen => 8,
            Element::Fluorine => 9,
            Element::Sodium => 11,
            Element::Magnesium => 12,
            Element::Phosphorus => 15,
            Element::Sulfur => 16,
            Element::Chlorine => 17,
            Element::Potassium => 19,
            Element::Calcium => 20,
            Element::Iron => 26,
            Element::Zinc => 30,
            Element::Selenium => 34,
            Element::Bromine => 35,
            Element::Iodine => 53,
        }
    }

    /// Default valence used to infer implicit hydrogen counts for
    /// organic-subset atoms. Metals get 0 (no implicit H).
    pub fn default_valence(&self) -> u8 {
        self.allowed_valences().first().copied().unwrap_or(0)
    }

    /// Valence states accepted during sanitization, smallest first.
    /// N(V), S(IV/VI), and P(V) cover nitro, sulfone, and phosphate groups
    /// written in their neutral hypervalent forms.
    pub fn allowed_valences(&self) -> &'static [u8] {
        match self {
            Element::Hydrogen => &[1],
            Element::Boron => &[3],
            Element::Carbon => &[4],
            Element::Nitrogen => &[3, 5],
            Element::Oxygen => &[2],
            Element::Phosphorus => &[3, 5],
            Element::Sulfur => &[2, 4, 6],
            Element::Fluorine | Element::Chlorine | Element::Bromine | Element::Iodine => &[1],
            Element::Selenium => &[2, 4, 6],
            _ => &[],
        }
    }
}
