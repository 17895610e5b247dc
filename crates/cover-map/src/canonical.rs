//! Canonical vaccine table.

use serde::Serialize;

use cover_model::Vaccine;

/// One canonical vaccine and the spellings it is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanonicalVaccine {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
}

impl CanonicalVaccine {
    /// Dimension row for this vaccine.
    pub fn to_vaccine(&self) -> Vaccine {
        Vaccine {
            vaccine_code: self.code.to_string(),
            vaccine_name: self.name.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Vaccines of the routine childhood schedule and the targeted programmes.
pub static CANONICAL_VACCINES: &[CanonicalVaccine] = &[
    CanonicalVaccine {
        code: "DTaP_IPV_Hib_HepB",
        name: "DTaP/IPV/Hib/HepB",
        description: "Diphtheria, Tetanus, Pertussis, Polio, Hib, Hepatitis B (6-in-1)",
        aliases: &["DTaP/IPV/Hib/HepB Prim", "DTaP IPV Hib HepB"],
    },
    CanonicalVaccine {
        code: "DTaP_IPV_Hib",
        name: "DTaP/IPV/Hib",
        description: "Diphtheria, Tetanus, Pertussis, Polio, Hib (5-in-1)",
        aliases: &["DTaP/IPV/Hib Prim"],
    },
    CanonicalVaccine {
        code: "MMR1",
        name: "MMR1",
        description: "Measles, Mumps, Rubella (first dose)",
        aliases: &["MMR 1", "MMR dose 1"],
    },
    CanonicalVaccine {
        code: "MMR2",
        name: "MMR2",
        description: "Measles, Mumps, Rubella (second dose)",
        aliases: &["MMR 2", "MMR dose 2"],
    },
    CanonicalVaccine {
        code: "PCV1",
        name: "PCV1",
        description: "Pneumococcal conjugate vaccine (first dose)",
        aliases: &["PCV 1", "PCV dose 1", "PCV"],
    },
    CanonicalVaccine {
        code: "PCV_booster",
        name: "PCV Booster",
        description: "Pneumococcal conjugate vaccine (booster)",
        aliases: &["PCV booster", "PCV boos"],
    },
    CanonicalVaccine {
        code: "Rota",
        name: "Rotavirus",
        description: "Rotavirus vaccine",
        aliases: &["rota", "Rota"],
    },
    CanonicalVaccine {
        code: "MenB",
        name: "MenB",
        description: "Meningococcal B vaccine",
        aliases: &[],
    },
    CanonicalVaccine {
        code: "MenB_booster",
        name: "MenB Booster",
        description: "Meningococcal B vaccine (booster)",
        aliases: &["MenB booster", "MenB boos"],
    },
    CanonicalVaccine {
        code: "Hib_MenC_booster",
        name: "Hib/MenC Booster",
        description: "Hib and meningococcal C booster",
        aliases: &["Hib/MenC booster", "Hib MenC booster"],
    },
    CanonicalVaccine {
        code: "dTaP_IPV_booster",
        name: "dTaP/IPV Booster",
        description: "Pre-school booster",
        aliases: &["dTaP/IPV booster", "DTaP/IPV booster"],
    },
    CanonicalVaccine {
        code: "HepB",
        name: "Hepatitis B",
        description: "Hepatitis B vaccine for eligible children",
        aliases: &["HepB", "Hep B"],
    },
    CanonicalVaccine {
        code: "BCG",
        name: "BCG",
        description: "BCG (Bacillus Calmette-Guérin) vaccine for eligible children",
        aliases: &[],
    },
];

/// Looks up a canonical vaccine by code.
pub fn canonical_vaccine(code: &str) -> Option<&'static CanonicalVaccine> {
    CANONICAL_VACCINES.iter().find(|vaccine| vaccine.code == code)
}
