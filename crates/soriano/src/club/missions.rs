use std::sync::Arc;

use serde::Serialize;

use crate::coverage::{ExistingPolicies, PolicyType, UserId};

/// Mission priority; the rank drives the single sort applied to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl MissionPriority {
    pub const fn rank(self) -> u8 {
        match self {
            MissionPriority::Critical => 0,
            MissionPriority::High => 1,
            MissionPriority::Medium => 2,
            MissionPriority::Low => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionCategory {
    Profile,
    Policies,
    Club,
}

/// Personal-area sections the customer has filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileCompleteness {
    pub personal_data: bool,
    pub phone_verified: bool,
    pub address_complete: bool,
    pub risk_questionnaire: bool,
    pub identity_documents: u32,
    pub avatar: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOwnership {
    pub held: ExistingPolicies,
    pub pending_renewals: u32,
    pub open_claims: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubActivity {
    pub referrals: u32,
    pub spun_wheel_today: bool,
    pub newsletter_opt_in: bool,
}

/// Independent fact sources the generator aggregates.
pub trait MissionFacts: Send + Sync {
    fn completeness(&self, user_id: &UserId) -> Result<ProfileCompleteness, MissionError>;
    fn ownership(&self, user_id: &UserId) -> Result<PolicyOwnership, MissionError>;
    fn activity(&self, user_id: &UserId) -> Result<ClubActivity, MissionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("mission facts unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissionKind {
    RiskQuestionnaire,
    PersonalData,
    UploadIdentity,
    VerifyPhone,
    CompleteAddress,
    AddAvatar,
    FirstPolicy,
    SecondPolicy,
    ProtectMortgage,
    ReviewRenewals,
    FollowClaims,
    ReferFriend,
    Newsletter,
    DailySpin,
}

impl MissionKind {
    fn mission(self) -> Mission {
        use MissionCategory::{Club, Policies, Profile};
        use MissionPriority::{Critical, High, Low, Medium};

        let (id, title, description, category, priority, points, xp) = match self {
            MissionKind::RiskQuestionnaire => (
                "risk-questionnaire",
                "Completa tu análisis de riesgos",
                "Responde el cuestionario y descubre tu puntuación de protección",
                Profile,
                Critical,
                150,
                75,
            ),
            MissionKind::PersonalData => (
                "personal-data",
                "Completa tus datos personales",
                "Nombre, fecha de nacimiento y situación familiar",
                Profile,
                High,
                50,
                25,
            ),
            MissionKind::UploadIdentity => (
                "upload-identity",
                "Sube tu documento de identidad",
                "Agiliza cualquier trámite o siniestro futuro",
                Profile,
                High,
                100,
                50,
            ),
            MissionKind::VerifyPhone => (
                "verify-phone",
                "Verifica tu teléfono",
                "Recibe avisos de tus pólizas al instante",
                Profile,
                Medium,
                30,
                15,
            ),
            MissionKind::CompleteAddress => (
                "complete-address",
                "Añade tu dirección",
                "Necesaria para enviarte la documentación en papel",
                Profile,
                Low,
                20,
                10,
            ),
            MissionKind::AddAvatar => (
                "add-avatar",
                "Personaliza tu avatar",
                "Haz tuyo tu área de cliente",
                Profile,
                Low,
                10,
                5,
            ),
            MissionKind::FirstPolicy => (
                "first-policy",
                "Contrata tu primera póliza",
                "Empieza a proteger lo que más te importa",
                Policies,
                Critical,
                500,
                250,
            ),
            MissionKind::SecondPolicy => (
                "second-policy",
                "Añade una segunda póliza",
                "Agrupar seguros con Soriano reduce tu prima",
                Policies,
                High,
                300,
                150,
            ),
            MissionKind::ProtectMortgage => (
                "protect-mortgage",
                "Protege tu hipoteca con un seguro de vida",
                "Tienes seguro de hogar pero tu familia no está cubierta",
                Policies,
                High,
                200,
                100,
            ),
            MissionKind::ReviewRenewals => (
                "review-renewals",
                "Revisa tus renovaciones",
                "Tienes pólizas que vencen pronto",
                Policies,
                Medium,
                40,
                20,
            ),
            MissionKind::FollowClaims => (
                "follow-claims",
                "Consulta tus siniestros abiertos",
                "Revisa el estado y aporta la documentación pendiente",
                Policies,
                Medium,
                25,
                10,
            ),
            MissionKind::ReferFriend => (
                "refer-friend",
                "Invita a un amigo al Club",
                "Gana puntos cuando tu amigo contrate su primera póliza",
                Club,
                Medium,
                250,
                100,
            ),
            MissionKind::Newsletter => (
                "newsletter",
                "Suscríbete a la newsletter",
                "Consejos de prevención y ofertas exclusivas",
                Club,
                Low,
                15,
                5,
            ),
            MissionKind::DailySpin => (
                "daily-spin",
                "Gira la ruleta diaria",
                "Una tirada gratis cada día",
                Club,
                Low,
                5,
                5,
            ),
        };

        Mission {
            id,
            title,
            description,
            category,
            priority,
            points,
            xp,
        }
    }
}

/// Recommendation shown on the club dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mission {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: MissionCategory,
    pub priority: MissionPriority,
    pub points: u32,
    pub xp: u32,
}

pub struct MissionGenerator<F> {
    facts: Arc<F>,
}

impl<F> MissionGenerator<F>
where
    F: MissionFacts + 'static,
{
    pub fn new(facts: Arc<F>) -> Self {
        Self { facts }
    }

    pub fn generate(&self, user_id: &UserId) -> Result<Vec<Mission>, MissionError> {
        let completeness = self.facts.completeness(user_id)?;
        let ownership = self.facts.ownership(user_id)?;
        let activity = self.facts.activity(user_id)?;

        let mut missions: Vec<Mission> = pending_missions(&completeness, &ownership, &activity)
            .into_iter()
            .map(MissionKind::mission)
            .collect();
        missions.sort_by_key(|mission| mission.priority.rank());

        tracing::debug!(user = %user_id.0, count = missions.len(), "missions generated");
        Ok(missions)
    }
}

fn pending_missions(
    completeness: &ProfileCompleteness,
    ownership: &PolicyOwnership,
    activity: &ClubActivity,
) -> Vec<MissionKind> {
    let mut kinds = Vec::new();

    if !completeness.personal_data {
        kinds.push(MissionKind::PersonalData);
    }
    if !completeness.phone_verified {
        kinds.push(MissionKind::VerifyPhone);
    }
    if !completeness.address_complete {
        kinds.push(MissionKind::CompleteAddress);
    }
    if !completeness.risk_questionnaire {
        kinds.push(MissionKind::RiskQuestionnaire);
    }
    if completeness.identity_documents == 0 {
        kinds.push(MissionKind::UploadIdentity);
    }
    if !completeness.avatar {
        kinds.push(MissionKind::AddAvatar);
    }

    match ownership.held.len() {
        0 => kinds.push(MissionKind::FirstPolicy),
        1 => kinds.push(MissionKind::SecondPolicy),
        _ => {}
    }
    if ownership.held.contains(PolicyType::Hogar) && !ownership.held.contains(PolicyType::Vida) {
        kinds.push(MissionKind::ProtectMortgage);
    }
    if ownership.pending_renewals > 0 {
        kinds.push(MissionKind::ReviewRenewals);
    }
    if ownership.open_claims > 0 {
        kinds.push(MissionKind::FollowClaims);
    }

    if activity.referrals == 0 {
        kinds.push(MissionKind::ReferFriend);
    }
    if !activity.newsletter_opt_in {
        kinds.push(MissionKind::Newsletter);
    }
    if !activity.spun_wheel_today {
        kinds.push(MissionKind::DailySpin);
    }

    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedFacts {
        completeness: ProfileCompleteness,
        ownership: PolicyOwnership,
        activity: ClubActivity,
    }

    impl MissionFacts for FixedFacts {
        fn completeness(&self, _user_id: &UserId) -> Result<ProfileCompleteness, MissionError> {
            Ok(self.completeness.clone())
        }

        fn ownership(&self, _user_id: &UserId) -> Result<PolicyOwnership, MissionError> {
            Ok(self.ownership.clone())
        }

        fn activity(&self, _user_id: &UserId) -> Result<ClubActivity, MissionError> {
            Ok(self.activity.clone())
        }
    }

    struct OfflineFacts;

    impl MissionFacts for OfflineFacts {
        fn completeness(&self, _user_id: &UserId) -> Result<ProfileCompleteness, MissionError> {
            Ok(ProfileCompleteness::default())
        }

        fn ownership(&self, _user_id: &UserId) -> Result<PolicyOwnership, MissionError> {
            Err(MissionError::Unavailable("policies table offline".to_string()))
        }

        fn activity(&self, _user_id: &UserId) -> Result<ClubActivity, MissionError> {
            Ok(ClubActivity::default())
        }
    }

    fn user() -> UserId {
        UserId("cliente-9".to_string())
    }

    fn complete_profile() -> ProfileCompleteness {
        ProfileCompleteness {
            personal_data: true,
            phone_verified: true,
            address_complete: true,
            risk_questionnaire: true,
            identity_documents: 1,
            avatar: true,
        }
    }

    fn engaged_member() -> ClubActivity {
        ClubActivity {
            referrals: 2,
            spun_wheel_today: true,
            newsletter_opt_in: true,
        }
    }

    #[test]
    fn new_customer_gets_every_onboarding_mission_sorted_by_priority() {
        let generator = MissionGenerator::new(Arc::new(FixedFacts {
            completeness: ProfileCompleteness::default(),
            ownership: PolicyOwnership::default(),
            activity: ClubActivity::default(),
        }));

        let missions = generator.generate(&user()).expect("facts available");
        let ids: Vec<&str> = missions.iter().map(|mission| mission.id).collect();

        assert_eq!(
            ids,
            vec![
                "risk-questionnaire",
                "first-policy",
                "personal-data",
                "upload-identity",
                "verify-phone",
                "refer-friend",
                "complete-address",
                "add-avatar",
                "newsletter",
                "daily-spin",
            ]
        );
        assert!(missions
            .windows(2)
            .all(|pair| pair[0].priority.rank() <= pair[1].priority.rank()));
    }

    #[test]
    fn ownership_facts_drive_policy_missions() {
        let generator = MissionGenerator::new(Arc::new(FixedFacts {
            completeness: complete_profile(),
            ownership: PolicyOwnership {
                held: [PolicyType::Hogar].into_iter().collect(),
                pending_renewals: 1,
                open_claims: 1,
            },
            activity: engaged_member(),
        }));

        let missions = generator.generate(&user()).expect("facts available");
        let ids: Vec<&str> = missions.iter().map(|mission| mission.id).collect();

        assert_eq!(
            ids,
            vec![
                "second-policy",
                "protect-mortgage",
                "review-renewals",
                "follow-claims",
            ]
        );
        assert_eq!(missions[0].points, 300);
        assert_eq!(missions[0].xp, 150);
        assert_eq!(missions[0].category, MissionCategory::Policies);
    }

    #[test]
    fn fully_engaged_customer_has_no_missions() {
        let generator = MissionGenerator::new(Arc::new(FixedFacts {
            completeness: complete_profile(),
            ownership: PolicyOwnership {
                held: [PolicyType::Hogar, PolicyType::Vida].into_iter().collect(),
                pending_renewals: 0,
                open_claims: 0,
            },
            activity: engaged_member(),
        }));

        assert!(generator
            .generate(&user())
            .expect("facts available")
            .is_empty());
    }

    #[test]
    fn fact_source_failures_propagate() {
        let generator = MissionGenerator::new(Arc::new(OfflineFacts));
        assert!(matches!(
            generator.generate(&user()),
            Err(MissionError::Unavailable(_))
        ));
    }
}
