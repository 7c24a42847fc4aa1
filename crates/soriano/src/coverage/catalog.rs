use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{PolicyType, UserProfile};

/// Recommendation tier attached to each catalog line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl PolicyPriority {
    pub const fn label(self) -> &'static str {
        match self {
            PolicyPriority::Critical => "critical",
            PolicyPriority::High => "high",
            PolicyPriority::Medium => "medium",
            PolicyPriority::Low => "low",
        }
    }
}

/// Estimated monthly premium band in euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCostRange {
    pub min: u32,
    pub max: u32,
}

impl MonthlyCostRange {
    pub fn midpoint(&self) -> f64 {
        (f64::from(self.min) + f64::from(self.max)) / 2.0
    }
}

/// Static metadata for one policy line plus the predicate deciding whether it
/// applies to a given profile.
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub policy_type: PolicyType,
    pub name: &'static str,
    pub priority: PolicyPriority,
    pub urgency: u8,
    pub monthly_cost: MonthlyCostRange,
    pub potential_loss: u64,
    pub reason: &'static str,
    pub coverages: &'static [&'static str],
    relevance: fn(&UserProfile) -> bool,
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("policy_type", &self.policy_type)
            .field("priority", &self.priority)
            .field("urgency", &self.urgency)
            .finish_non_exhaustive()
    }
}

impl CatalogEntry {
    pub fn is_relevant(&self, profile: &UserProfile) -> bool {
        (self.relevance)(profile)
    }
}

/// Catalog order doubles as the tie-break order for equal urgency.
pub fn standard_catalog() -> &'static [CatalogEntry] {
    &STANDARD_CATALOG
}

static STANDARD_CATALOG: [CatalogEntry; 9] = [
    CatalogEntry {
        policy_type: PolicyType::Vida,
        name: "Seguro de Vida",
        priority: PolicyPriority::Critical,
        urgency: 10,
        monthly_cost: MonthlyCostRange { min: 25, max: 60 },
        potential_loss: 150_000,
        reason: "Protege a tu familia y tu hipoteca si faltas o quedas incapacitado",
        coverages: &[
            "Fallecimiento por cualquier causa",
            "Invalidez absoluta y permanente",
            "Cancelación del capital pendiente de la hipoteca",
        ],
        relevance: |profile| profile.has_dependents() || profile.has_mortgage(),
    },
    CatalogEntry {
        policy_type: PolicyType::Hogar,
        name: "Seguro de Hogar",
        priority: PolicyPriority::High,
        urgency: 8,
        monthly_cost: MonthlyCostRange { min: 15, max: 40 },
        potential_loss: 80_000,
        reason: "Tu vivienda es tu mayor patrimonio y la entidad bancaria lo exige",
        coverages: &[
            "Continente y contenido",
            "Daños por agua, incendio y robo",
            "Responsabilidad civil familiar",
        ],
        relevance: |profile| profile.owns_home(),
    },
    CatalogEntry {
        policy_type: PolicyType::Salud,
        name: "Seguro de Salud",
        priority: PolicyPriority::High,
        urgency: 8,
        monthly_cost: MonthlyCostRange { min: 40, max: 120 },
        potential_loss: 30_000,
        reason: "Acceso rápido a especialistas sin listas de espera",
        coverages: &[
            "Medicina general y especialistas",
            "Hospitalización y cirugía",
            "Pruebas diagnósticas",
        ],
        relevance: |profile| {
            !profile.has_private_health()
                && (profile.has_dependents()
                    || profile.has_health_conditions()
                    || profile.age_at_least(40)
                    || profile.is_high_income())
        },
    },
    CatalogEntry {
        policy_type: PolicyType::Auto,
        name: "Seguro de Auto",
        priority: PolicyPriority::Critical,
        urgency: 9,
        monthly_cost: MonthlyCostRange { min: 30, max: 90 },
        potential_loss: 50_000,
        reason: "El seguro de responsabilidad civil del vehículo es obligatorio",
        coverages: &[
            "Responsabilidad civil obligatoria",
            "Asistencia en viaje 24h",
            "Daños propios y lunas",
        ],
        relevance: |profile| profile.has_vehicle(),
    },
    CatalogEntry {
        policy_type: PolicyType::Decesos,
        name: "Seguro de Decesos",
        priority: PolicyPriority::Medium,
        urgency: 5,
        monthly_cost: MonthlyCostRange { min: 8, max: 25 },
        potential_loss: 4_000,
        reason: "Evita a tu familia los gastos y trámites del sepelio",
        coverages: &[
            "Servicio funerario completo",
            "Gestión de trámites",
            "Asistencia psicológica familiar",
        ],
        relevance: |profile| {
            profile.age_at_least(50) || profile.has_dependents() || profile.has_partner()
        },
    },
    CatalogEntry {
        policy_type: PolicyType::Accidentes,
        name: "Seguro de Accidentes",
        priority: PolicyPriority::High,
        urgency: 7,
        monthly_cost: MonthlyCostRange { min: 10, max: 30 },
        potential_loss: 60_000,
        reason: "Como autónomo no tienes cobertura si un accidente te impide trabajar",
        coverages: &[
            "Indemnización por incapacidad temporal",
            "Invalidez permanente por accidente",
            "Gastos de rehabilitación",
        ],
        relevance: |profile| profile.is_self_employed(),
    },
    CatalogEntry {
        policy_type: PolicyType::Viaje,
        name: "Seguro de Viaje",
        priority: PolicyPriority::Low,
        urgency: 3,
        monthly_cost: MonthlyCostRange { min: 5, max: 15 },
        potential_loss: 6_000,
        reason: "Viajas a menudo y una urgencia médica en el extranjero sale cara",
        coverages: &[
            "Asistencia médica en el extranjero",
            "Cancelación de viaje",
            "Pérdida de equipaje",
        ],
        relevance: |profile| profile.travels_frequently(),
    },
    CatalogEntry {
        policy_type: PolicyType::Mascotas,
        name: "Seguro de Mascotas",
        priority: PolicyPriority::Low,
        urgency: 3,
        monthly_cost: MonthlyCostRange { min: 10, max: 30 },
        potential_loss: 3_000,
        reason: "Cubre veterinario y la responsabilidad civil de tus animales",
        coverages: &[
            "Responsabilidad civil",
            "Asistencia veterinaria",
            "Extravío y robo",
        ],
        relevance: |profile| profile.has_pets(),
    },
    CatalogEntry {
        policy_type: PolicyType::Dental,
        name: "Seguro Dental",
        priority: PolicyPriority::Low,
        urgency: 2,
        monthly_cost: MonthlyCostRange { min: 8, max: 20 },
        potential_loss: 1_500,
        reason: "Ortodoncias y revisiones para los tuyos a precio cerrado",
        coverages: &[
            "Limpiezas y revisiones",
            "Ortodoncia infantil",
            "Descuentos en tratamientos",
        ],
        relevance: |profile| profile.has_dependents(),
    },
];
