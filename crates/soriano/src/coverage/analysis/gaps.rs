use serde::{Deserialize, Serialize};

use super::super::domain::{ExistingPolicies, PolicyType, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Critica,
    Alta,
    Media,
    Baja,
}

/// Narrative describing a mismatch between the declared situation and holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGap {
    pub area: String,
    pub severity: GapSeverity,
    pub impact: String,
    pub solution: String,
}

struct GapTemplate {
    area: &'static str,
    severity: GapSeverity,
    impact: &'static str,
    solution: &'static str,
    applies: fn(&UserProfile, &ExistingPolicies) -> bool,
}

impl GapTemplate {
    fn render(&self) -> CoverageGap {
        CoverageGap {
            area: self.area.to_string(),
            severity: self.severity,
            impact: self.impact.to_string(),
            solution: self.solution.to_string(),
        }
    }
}

static GAP_TEMPLATES: [GapTemplate; 7] = [
    GapTemplate {
        area: "Hipoteca sin seguro de vida",
        severity: GapSeverity::Critica,
        impact: "Si faltas, tu familia tendría que asumir la deuda hipotecaria pendiente",
        solution: "Contrata un seguro de vida vinculado al capital pendiente de la hipoteca",
        applies: |profile, existing| {
            profile.has_mortgage() && !existing.contains(PolicyType::Vida)
        },
    },
    GapTemplate {
        area: "Familia sin cobertura sanitaria privada",
        severity: GapSeverity::Alta,
        impact: "Tus dependientes dependen solo de la sanidad pública y sus listas de espera",
        solution: "Añade un seguro de salud familiar con pediatría y especialistas",
        applies: |profile, existing| {
            profile.has_dependents()
                && !profile.has_private_health()
                && !existing.contains(PolicyType::Salud)
        },
    },
    GapTemplate {
        area: "Vehículo sin seguro",
        severity: GapSeverity::Critica,
        impact: "Circular sin seguro conlleva sanciones y responsabilidad ilimitada ante terceros",
        solution: "Contrata al menos la responsabilidad civil obligatoria del vehículo",
        applies: |profile, existing| profile.has_vehicle() && !existing.contains(PolicyType::Auto),
    },
    GapTemplate {
        area: "Vivienda sin seguro de hogar",
        severity: GapSeverity::Alta,
        impact: "Un incendio o una fuga de agua podría costarte decenas de miles de euros",
        solution: "Asegura continente y contenido de tu vivienda",
        applies: |profile, existing| profile.owns_home() && !existing.contains(PolicyType::Hogar),
    },
    GapTemplate {
        area: "Ingresos de autónomo sin protección",
        severity: GapSeverity::Media,
        impact: "Una baja por accidente detiene tus ingresos desde el primer día",
        solution: "Contrata un seguro de accidentes con indemnización diaria",
        applies: |profile, existing| {
            profile.is_self_employed() && !existing.contains(PolicyType::Accidentes)
        },
    },
    GapTemplate {
        area: "Mascotas sin responsabilidad civil",
        severity: GapSeverity::Baja,
        impact: "Los daños que cause tu mascota a terceros corren de tu cuenta",
        solution: "Añade un seguro de mascotas con responsabilidad civil",
        applies: |profile, existing| profile.has_pets() && !existing.contains(PolicyType::Mascotas),
    },
    GapTemplate {
        area: "Viajes frecuentes sin asistencia",
        severity: GapSeverity::Baja,
        impact: "Una hospitalización en el extranjero puede superar varios miles de euros",
        solution: "Contrata un seguro de viaje anual multiviaje",
        applies: |profile, existing| {
            profile.travels_frequently() && !existing.contains(PolicyType::Viaje)
        },
    },
];

/// Every template that matches contributes one gap, in template order.
pub(crate) fn detect_gaps(profile: &UserProfile, existing: &ExistingPolicies) -> Vec<CoverageGap> {
    GAP_TEMPLATES
        .iter()
        .filter(|template| (template.applies)(profile, existing))
        .map(GapTemplate::render)
        .collect()
}
