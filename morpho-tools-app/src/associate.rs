/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! Basin-stream association. Segments are first joined with a strict
//! "within" predicate; only when that join matches nothing anywhere do we
//! fall back to an "intersects" join for the whole layer.

use crate::context::{Basin, StreamSegment};
use morpho_common::structures::Point2D;
use rstar::{RTree, RTreeObject, AABB};

struct BasinEnvelope {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for BasinEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Which spatial predicate ended up assigning the segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoinPredicate {
    Within,
    Intersects,
}

#[derive(Debug, Clone, Copy)]
pub struct AssociationReport {
    pub predicate: JoinPredicate,
    pub assigned: usize,
    pub orphans: usize,
}

/// Every vertex of the segment inside the basin, holes honoured.
fn segment_within(seg: &StreamSegment, basin: &Basin) -> bool {
    seg.points.iter().all(|p| basin.contains(p))
}

/// Any vertex or chord midpoint inside the basin.
fn segment_intersects(seg: &StreamSegment, basin: &Basin) -> bool {
    if seg.points.iter().any(|p| basin.contains(p)) {
        return true;
    }
    for i in 1..seg.points.len() {
        if basin.contains(&Point2D::midpoint(&seg.points[i - 1], &seg.points[i])) {
            return true;
        }
    }
    false
}

/// The length of the segment's chords whose midpoints fall inside the
/// basin, used as the tie-break for boundary-straddling segments.
fn contained_length(seg: &StreamSegment, basin: &Basin) -> f64 {
    let mut length = 0f64;
    for i in 1..seg.points.len() {
        let a = seg.points[i - 1];
        let b = seg.points[i];
        if basin.contains(&Point2D::midpoint(&a, &b)) {
            length += a.distance(&b);
        }
    }
    length
}

/// Assigns each stream segment to its owning basin, writing `basin_id` in
/// place. A segment intersecting several basins under the fallback
/// predicate goes to the basin holding the longest share of its length.
pub fn associate_streams(
    basins: &[Basin],
    streams: &mut Vec<StreamSegment>,
    verbose: bool,
) -> AssociationReport {
    let entries: Vec<BasinEnvelope> = basins
        .iter()
        .enumerate()
        .map(|(index, b)| BasinEnvelope {
            index: index,
            aabb: AABB::from_corners(
                [b.bbox.min_x, b.bbox.min_y],
                [b.bbox.max_x, b.bbox.max_y],
            ),
        })
        .collect();
    let tree = RTree::bulk_load(entries);

    let candidates = |seg: &StreamSegment| -> Vec<usize> {
        let bb = seg.get_bounding_box();
        tree.locate_in_envelope_intersecting(&AABB::from_corners(
            [bb.min_x, bb.min_y],
            [bb.max_x, bb.max_y],
        ))
        .map(|e| e.index)
        .collect()
    };

    // first pass: strict containment
    let mut assigned = 0usize;
    for seg in streams.iter_mut() {
        seg.basin_id = None;
        for index in candidates(seg) {
            if segment_within(seg, &basins[index]) {
                seg.basin_id = Some(basins[index].basin_id.clone());
                assigned += 1;
                break;
            }
        }
    }

    let mut predicate = JoinPredicate::Within;
    if assigned == 0 && !streams.is_empty() {
        // nothing matched anywhere, which indicates a coordinate or
        // topology mismatch between the layers
        println!(
            "Warning: no stream segment is fully within any basin; falling back to an intersects join."
        );
        predicate = JoinPredicate::Intersects;
        for seg in streams.iter_mut() {
            let mut best: Option<(usize, f64)> = None;
            for index in candidates(seg) {
                if segment_intersects(seg, &basins[index]) {
                    let len = contained_length(seg, &basins[index]);
                    if best.map_or(true, |(_, l)| len > l) {
                        best = Some((index, len));
                    }
                }
            }
            if let Some((index, _)) = best {
                seg.basin_id = Some(basins[index].basin_id.clone());
                assigned += 1;
            }
        }
    }

    let orphans = streams.len() - assigned;
    if verbose {
        println!(
            "Associated {} of {} stream segment(s); {} orphan(s) retained outside per-basin statistics.",
            assigned,
            streams.len(),
            orphans
        );
    }
    AssociationReport {
        predicate: predicate,
        assigned: assigned,
        orphans: orphans,
    }
}
