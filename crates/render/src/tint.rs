use battletanks_common::EntityKind;
use battletanks_kernel::Entity;

const SATURATION: f64 = 0.8;
const BASE_LIGHTNESS: f64 = 0.5;
const MAX_SHOWN_HEALTH: i32 = 3;

/// HSL color for an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Tint {
    /// Users darken as they lose health: lightness runs from 0.3 at zero
    /// health to 0.6 at three or more. Foes and food keep the base lightness.
    pub fn for_entity(entity: &Entity) -> Self {
        let lightness = match (entity.kind, entity.health) {
            (EntityKind::User, Some(health)) => {
                let shown = health.clamp(0, MAX_SHOWN_HEALTH) as f64;
                0.3 + (shown / MAX_SHOWN_HEALTH as f64) * 0.3
            }
            _ => BASE_LIGHTNESS,
        };
        Self {
            hue: entity.hue,
            saturation: SATURATION,
            lightness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battletanks_common::EntityId;
    use glam::DVec2;

    fn entity(kind: EntityKind, health: Option<i32>) -> Entity {
        Entity {
            id: EntityId("x".into()),
            kind,
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            health,
            hue: 0.25,
        }
    }

    #[test]
    fn user_lightness_follows_health() {
        assert_eq!(Tint::for_entity(&entity(EntityKind::User, Some(3))).lightness, 0.6);
        assert_eq!(Tint::for_entity(&entity(EntityKind::User, Some(0))).lightness, 0.3);
        assert_eq!(
            Tint::for_entity(&entity(EntityKind::User, Some(9))).lightness,
            Tint::for_entity(&entity(EntityKind::User, Some(3))).lightness
        );
        assert_eq!(
            Tint::for_entity(&entity(EntityKind::User, Some(-2))).lightness,
            0.3
        );
    }

    #[test]
    fn others_use_base_lightness() {
        let t = Tint::for_entity(&entity(EntityKind::Foe, None));
        assert_eq!(t.lightness, 0.5);
        assert_eq!(t.hue, 0.25);
        assert_eq!(t.saturation, 0.8);
    }
}
