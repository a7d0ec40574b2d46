//! Positional bookkeeping: approach moves and end-of-tick separation.

use crate::combatant::{Combatant, Position};

/// Moves `unit` towards `goal` at `speed` units per second, stopping once it
/// is within `range` of the goal.
pub(crate) fn approach(unit: &mut Combatant, goal: Position, range: f64, speed: f64, dt: f64) {
    let distance = unit.position.distance(&goal);
    let gap = distance - range;
    if gap <= 0.0 || speed <= 0.0 {
        return;
    }
    unit.position = unit.position.step_towards(&goal, (speed * dt).min(gap));
}

/// One pass over every pair of living combatants, pushing each overlapping
/// pair out to `min_distance` and splitting the correction evenly.
///
/// Coincident units are separated along the x axis, lower index to the left.
pub(crate) fn separate(roster: &mut [Combatant], min_distance: f64) {
    if !(min_distance > 0.0) {
        return;
    }
    for i in 0..roster.len() {
        for j in (i + 1)..roster.len() {
            if !roster[i].is_alive() || !roster[j].is_alive() {
                continue;
            }
            let (a, b) = (roster[i].position, roster[j].position);
            let distance = a.distance(&b);
            if distance >= min_distance {
                continue;
            }
            let (nx, ny) = if distance > f64::EPSILON {
                ((b.x - a.x) / distance, (b.y - a.y) / distance)
            } else {
                (1.0, 0.0)
            };
            let push = (min_distance - distance) / 2.0;
            roster[i].position = Position::new(a.x - nx * push, a.y - ny * push);
            roster[j].position = Position::new(b.x + nx * push, b.y + ny * push);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CombatantId, Role, Side};
    use crate::stats::{StatBlock, StatKey};

    fn unit(id: u32, x: f64) -> Combatant {
        Combatant::new(
            CombatantId(id),
            "u",
            Side::Ally,
            Role::Melee,
            StatBlock::ZERO.with(StatKey::MaxHp, 10.0),
        )
        .with_position(Position::new(x, 0.0))
    }

    #[test]
    fn approach_stops_at_range() {
        let mut mover = unit(0, 0.0);
        approach(&mut mover, Position::new(10.0, 0.0), 2.0, 100.0, 1.0);
        assert!((mover.position.x - 8.0).abs() < 1e-9);

        approach(&mut mover, Position::new(10.0, 0.0), 2.0, 100.0, 1.0);
        assert!((mover.position.x - 8.0).abs() < 1e-9);
    }

    #[test]
    fn approach_is_limited_by_speed() {
        let mut mover = unit(0, 0.0);
        approach(&mut mover, Position::new(10.0, 0.0), 1.0, 3.0, 0.5);
        assert!((mover.position.x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn separation_restores_minimum_distance() {
        let mut roster = vec![unit(0, 0.0), unit(1, 0.0), unit(2, 0.2)];
        separate(&mut roster, 1.0);
        assert!(roster[0].distance_to(&roster[1]) >= 1.0 - 1e-9);
        assert!(roster[0].position.x < roster[1].position.x);
    }

    #[test]
    fn dead_units_do_not_collide() {
        let mut roster = vec![unit(0, 0.0), unit(1, 0.0)];
        roster[1].set_hp(0.0);
        separate(&mut roster, 1.0);
        assert_eq!(roster[0].position, Position::ORIGIN);
    }
}
