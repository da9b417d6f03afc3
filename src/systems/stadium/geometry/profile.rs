// stand cross-section builder
// the outline lives in the stand's local XY plane: X runs away from the pitch, Y is up

use bevy::prelude::*;

use crate::systems::stadium::params::TierSpec;

/// Where one tier's seating sits inside the profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierAnchor {
    pub tier: TierSpec,
    /// front edge of the first row, on top of the front wall
    pub row_start: Vec2,
    /// far end of the top walkway, at walkway height
    pub walkway_end: Vec2,
}

impl TierAnchor {
    /// Front edge and height of row `r`.
    pub fn row(&self, r: u32) -> Vec2 {
        self.row_start + Vec2::new(r as f32 * self.tier.row_step_depth, r as f32 * self.tier.row_step_height)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StandProfile {
    pub outline: Vec<Vec2>,
    pub depth: f32,
    pub height: f32,
    pub tiers: Vec<TierAnchor>,
}

impl StandProfile {
    pub fn total_rows(&self) -> u32 {
        self.tiers.iter().map(|t| t.tier.num_rows).sum()
    }
}

/// Builds the stepped outline for a stack of tiers.
/// Tiers without rows are skipped whole, offsets included; any later tier
/// still applies its own offsets.
pub fn build_profile(tiers: &[TierSpec]) -> StandProfile {
    let mut outline = vec![Vec2::ZERO];
    let mut anchors = Vec::new();
    let (mut x, mut y) = (0.0_f32, 0.0_f32);

    for (i, tier) in tiers.iter().enumerate() {
        if !tier.is_active() {
            continue;
        }

        if i > 0 {
            y += tier.vertical_offset;
            x += tier.horizontal_offset;
            outline.push(Vec2::new(x, y));
        }

        y += tier.front_wall_height;
        outline.push(Vec2::new(x, y));
        let row_start = Vec2::new(x, y);

        for _ in 0..tier.num_rows {
            x += tier.row_step_depth;
            outline.push(Vec2::new(x, y));
            y += tier.row_step_height;
            outline.push(Vec2::new(x, y));
        }

        x += tier.walkway_at_top_depth;
        outline.push(Vec2::new(x, y));
        let walkway_end = Vec2::new(x, y);

        if tier.back_wall_height > 0.0 {
            y += tier.back_wall_height;
            outline.push(Vec2::new(x, y));
        }

        anchors.push(TierAnchor { tier: *tier, row_start, walkway_end });
    }

    let depth = x;
    let height = y;
    outline.push(Vec2::new(x, 0.0));
    outline.push(Vec2::ZERO);

    StandProfile {
        outline,
        depth,
        height,
        tiers: anchors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::stadium::params::StandParams;

    fn tier(rows: u32) -> TierSpec {
        TierSpec {
            num_rows: rows,
            front_wall_height: 1.0,
            row_step_height: 0.4,
            row_step_depth: 0.8,
            walkway_at_top_depth: 1.5,
            back_wall_height: 0.5,
            vertical_offset: 3.0,
            horizontal_offset: -1.0,
        }
    }

    #[test]
    fn single_tier_dimensions() {
        let p = build_profile(&[tier(20)]);
        // 20 * 0.8 + 1.5
        assert!((p.depth - 17.5).abs() < 1e-4);
        // 1 + 20 * 0.4 + 0.5
        assert!((p.height - 9.5).abs() < 1e-4);
        assert_eq!(p.outline.first(), Some(&Vec2::ZERO));
        assert_eq!(p.outline.last(), Some(&Vec2::ZERO));
        assert_eq!(p.outline[p.outline.len() - 2], Vec2::new(p.depth, 0.0));
    }

    #[test]
    fn default_three_tiers() {
        let stands = StandParams::default();
        let p = build_profile(stands.active_tiers());
        // 17.5 + (-1 + 15 * 0.85 + 2) + (-1.5 + 10 * 0.9 + 1)
        assert!((p.depth - 39.75).abs() < 1e-3);
        // 9.5 + (3 + 0.5 + 6.75 + 1) + (3.5 + 0.5 + 5 + 1.5)
        assert!((p.height - 31.25).abs() < 1e-3);
        assert_eq!(p.tiers.len(), 3);
        assert_eq!(p.total_rows(), 45);
    }

    #[test]
    fn outline_never_steps_backwards_within_a_tier() {
        let p = build_profile(&[tier(12)]);
        let climb = &p.outline[..p.outline.len() - 2];
        for w in climb.windows(2) {
            assert!(w[1].x >= w[0].x);
            assert!(w[1].y >= w[0].y);
        }
    }

    #[test]
    fn more_rows_means_deeper_and_taller() {
        let mut last = build_profile(&[tier(1)]);
        for rows in 2..30 {
            let p = build_profile(&[tier(rows)]);
            assert!(p.depth > last.depth);
            assert!(p.height > last.height);
            last = p;
        }
    }

    #[test]
    fn deeper_steps_widen_the_profile() {
        let mut last = build_profile(&[tier(10)]);
        for step in [0.9, 1.0, 1.2, 1.5] {
            let p = build_profile(&[TierSpec { row_step_depth: step, ..tier(10) }]);
            assert!(p.depth > last.depth);
            assert_eq!(p.height, last.height);
            last = p;
        }
    }

    #[test]
    fn taller_steps_and_walls_raise_the_profile() {
        let base = build_profile(&[tier(10)]);
        let taller = [
            TierSpec { row_step_height: 0.6, ..tier(10) },
            TierSpec { front_wall_height: 2.5, ..tier(10) },
            TierSpec { back_wall_height: 3.0, ..tier(10) },
        ];
        for spec in taller {
            let p = build_profile(&[spec]);
            assert!(p.height > base.height, "{spec:?}");
            assert!((p.depth - base.depth).abs() < 1e-5);
        }
    }

    #[test]
    fn upper_tier_offsets_move_the_stack() {
        let base = build_profile(&[tier(10), tier(5)]);
        let raised = build_profile(&[tier(10), TierSpec { vertical_offset: 5.0, ..tier(5) }]);
        assert!((raised.height - base.height - 2.0).abs() < 1e-4);
        let pushed = build_profile(&[tier(10), TierSpec { horizontal_offset: 1.0, ..tier(5) }]);
        assert!((pushed.depth - base.depth - 2.0).abs() < 1e-4);
    }

    #[test]
    fn empty_tier_is_skipped_with_its_offsets() {
        let with_gap = build_profile(&[tier(10), tier(0), tier(5)]);
        let without = build_profile(&[tier(10), tier(5)]);
        assert_eq!(with_gap.outline, without.outline);
        assert_eq!(with_gap.tiers.len(), 2);
    }

    #[test]
    fn no_rows_gives_a_flat_profile() {
        let p = build_profile(&[tier(0)]);
        assert_eq!(p.depth, 0.0);
        assert_eq!(p.height, 0.0);
        assert!(p.tiers.is_empty());
    }

    #[test]
    fn anchors_follow_the_steps() {
        let p = build_profile(&[tier(4)]);
        let a = p.tiers[0];
        assert_eq!(a.row_start, Vec2::new(0.0, 1.0));
        assert!((a.row(2) - Vec2::new(1.6, 1.8)).length() < 1e-5);
        assert!((a.walkway_end - Vec2::new(4.7, 2.6)).length() < 1e-5);
    }
}
