//! Post-drag collision correction.
//!
//! Glyphs that overlap a moved glyph are pushed to sit immediately to its
//! right. Pushed glyphs are then checked in turn, until a pass pushes
//! nothing. Every push moves a glyph strictly to the right.

use crate::config::{EngineConfig, PrunePolicy};
use crate::glyph::GlyphId;
use crate::registry::Registry;
use kurbo::{Point, Rect};

/// Inclusive AABB overlap: touching edges count.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    !(a.x1 < b.x0 || a.x0 > b.x1 || a.y1 < b.y0 || a.y0 > b.y1)
}

/// Overlap with positive area. Glyphs that merely touch do not collide.
pub fn rects_collide(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Outcome of a correction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correction {
    /// Every glyph that was pushed, in the order it was first pushed.
    pub displaced: Vec<GlyphId>,
    /// Pushed glyphs that were pruned for leaving the canvas.
    pub removed: Vec<GlyphId>,
    /// Number of passes run, including the final quiet one.
    pub passes: usize,
}

impl Correction {
    /// True if nothing was moved.
    pub fn is_noop(&self) -> bool {
        self.displaced.is_empty()
    }
}

/// Push apart every glyph overlapping `moved`, then cascade until stable.
pub fn correct_positions<R: Registry + ?Sized>(
    registry: &mut R,
    moved: &[GlyphId],
    config: &EngineConfig,
) -> Correction {
    let mut report = Correction::default();
    let mut current: Vec<GlyphId> = moved.to_vec();

    while !current.is_empty() {
        if report.passes >= config.max_correction_passes {
            log::warn!(
                "Collision correction stopped after {} passes with {} glyphs pending",
                report.passes,
                current.len()
            );
            break;
        }
        report.passes += 1;

        let mut next: Vec<GlyphId> = Vec::new();
        let ids = registry.glyph_ids();
        for &pusher in &current {
            for &other in &ids {
                if other == pusher {
                    continue;
                }
                // Re-read both boxes: either may have moved earlier in this pass.
                let Some(a) = registry.bounds(pusher) else {
                    break;
                };
                let Some(b) = registry.bounds(other) else {
                    continue;
                };
                if !rects_collide(a, b) {
                    continue;
                }

                let target = Point::new(a.x1, b.y0);
                registry.move_to(other, target);
                if !report.displaced.contains(&other) {
                    report.displaced.push(other);
                }

                if target.x < 0.0 && config.prune == PrunePolicy::RemoveOutOfBounds {
                    registry.remove(other);
                    report.removed.push(other);
                    next.retain(|&id| id != other);
                } else if !next.contains(&other) {
                    next.push(other);
                }
            }
        }
        log::trace!("Correction pass {} displaced {} glyphs", report.passes, next.len());
        current = next;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Glyph;
    use crate::registry::GlyphRegistry;
    use kurbo::Size;

    fn add(registry: &mut GlyphRegistry, x: f64, y: f64) -> GlyphId {
        registry.add(Glyph::new('g', Point::new(x, y), Size::new(10.0, 10.0)))
    }

    fn assert_no_collisions(registry: &GlyphRegistry) {
        let glyphs: Vec<_> = registry.iter().collect();
        for (i, a) in glyphs.iter().enumerate() {
            for b in &glyphs[i + 1..] {
                assert!(
                    !rects_collide(a.bounds(), b.bounds()),
                    "{:?} collides with {:?}",
                    a.bounds(),
                    b.bounds()
                );
            }
        }
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(rects_overlap(a, Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(!rects_overlap(a, Rect::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!rects_overlap(a, Rect::new(0.0, 11.0, 10.0, 20.0)));
    }

    #[test]
    fn test_collide_excludes_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!rects_collide(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!rects_collide(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
        assert!(rects_collide(a, Rect::new(9.0, 9.0, 20.0, 20.0)));
    }

    #[test]
    fn test_push_sits_right_of_mover() {
        let mut registry = GlyphRegistry::new();
        let a = add(&mut registry, 0.0, 0.0);
        let b = add(&mut registry, 4.0, 3.0);

        let report = correct_positions(&mut registry, &[a], &EngineConfig::default());

        let b_box = registry.bounds(b).unwrap();
        assert!((b_box.x0 - 10.0).abs() < f64::EPSILON);
        assert!((b_box.y0 - 3.0).abs() < f64::EPSILON);
        assert_eq!(report.displaced, vec![b]);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn test_glyph_left_of_mover_jumps_right() {
        let mut registry = GlyphRegistry::new();
        let a = add(&mut registry, 10.0, 0.0);
        let b = add(&mut registry, 5.0, 0.0);

        correct_positions(&mut registry, &[a], &EngineConfig::default());

        assert_eq!(registry.bounds(b).unwrap().x0, 20.0);
    }

    #[test]
    fn test_cascade_reaches_fixpoint() {
        let mut registry = GlyphRegistry::new();
        let a = add(&mut registry, 0.0, 0.0);
        let b = add(&mut registry, 8.0, 0.0);
        let c = add(&mut registry, 15.0, 0.0);
        let d = add(&mut registry, 200.0, 0.0);

        let report = correct_positions(&mut registry, &[a], &EngineConfig::default());

        assert_eq!(registry.bounds(b).unwrap().x0, 10.0);
        assert_eq!(registry.bounds(c).unwrap().x0, 20.0);
        assert_eq!(registry.bounds(d).unwrap().x0, 200.0);
        assert_eq!(report.displaced, vec![b, c]);
        assert_no_collisions(&registry);
    }

    #[test]
    fn test_stacked_batch_fans_out() {
        let mut registry = GlyphRegistry::new();
        let ids: Vec<_> = (0..5).map(|_| add(&mut registry, 100.0, 50.0)).collect();

        correct_positions(&mut registry, &ids, &EngineConfig::default());

        let lefts: Vec<f64> = ids.iter().map(|&id| registry.bounds(id).unwrap().x0).collect();
        assert_eq!(lefts, vec![100.0, 110.0, 120.0, 130.0, 140.0]);
        assert_no_collisions(&registry);
    }

    #[test]
    fn test_correction_is_idempotent() {
        let mut registry = GlyphRegistry::new();
        let ids: Vec<_> = (0..4).map(|i| add(&mut registry, 3.0 * i as f64, 0.0)).collect();
        let config = EngineConfig::default();

        correct_positions(&mut registry, &ids, &config);
        let before: Vec<Rect> = ids.iter().map(|&id| registry.bounds(id).unwrap()).collect();

        let second = correct_positions(&mut registry, &ids, &config);
        let after: Vec<Rect> = ids.iter().map(|&id| registry.bounds(id).unwrap()).collect();

        assert!(second.is_noop());
        assert_eq!(second.passes, 1);
        assert_eq!(before, after);
    }

    #[test]
    fn test_different_rows_do_not_collide() {
        let mut registry = GlyphRegistry::new();
        let a = add(&mut registry, 0.0, 0.0);
        let b = add(&mut registry, 0.0, 10.0);

        let report = correct_positions(&mut registry, &[a], &EngineConfig::default());

        assert!(report.is_noop());
        assert_eq!(registry.bounds(b).unwrap().x0, 0.0);
    }

    #[test]
    fn test_prunes_pushed_glyph_left_of_canvas() {
        let mut registry = GlyphRegistry::new();
        let a = add(&mut registry, -30.0, 0.0);
        let b = add(&mut registry, -25.0, 0.0);

        let report = correct_positions(&mut registry, &[a], &EngineConfig::default());

        assert_eq!(report.removed, vec![b]);
        assert!(!registry.is_selectable(b));
        assert!(registry.is_selectable(a));
    }

    #[test]
    fn test_retain_policy_keeps_glyph() {
        let mut registry = GlyphRegistry::new();
        let a = add(&mut registry, -30.0, 0.0);
        let b = add(&mut registry, -25.0, 0.0);
        let config = EngineConfig {
            prune: PrunePolicy::Retain,
            ..EngineConfig::default()
        };

        let report = correct_positions(&mut registry, &[a], &config);

        assert!(report.removed.is_empty());
        assert_eq!(registry.bounds(b).unwrap().x0, -20.0);
    }

    #[test]
    fn test_pass_cap_stops_loop() {
        let mut registry = GlyphRegistry::new();
        let ids: Vec<_> = (0..6).map(|_| add(&mut registry, 0.0, 0.0)).collect();
        let config = EngineConfig {
            max_correction_passes: 1,
            ..EngineConfig::default()
        };

        let report = correct_positions(&mut registry, &ids[..1], &config);

        assert_eq!(report.passes, 1);
        assert_eq!(report.displaced.len(), 5);
    }
}
