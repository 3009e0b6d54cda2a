//! Fortune sweep orchestrator
//!
//! [`Voronoi`] owns the site source, beachline, circle-event queue and the
//! diagram accumulator for one run. It can be driven one event at a time
//! with [`Voronoi::step`] (for animation or debugging) or to completion with
//! [`Voronoi::run`]; both paths go through the same event handlers.

use glam::DVec2;

use super::beachline::{Beachline, HalfEdgeId};
use super::diagram::{Diagram, EdgeId, VertexId};
use super::events::EventQueue;
use super::geometry::{intersect, Bounds, Side, TOLERANCE};
use super::sites::{SiteId, SiteList};
use crate::error::{MapError, Result};

/// Where the sweep currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Constructed, no step taken yet
    AwaitingStep,
    /// Consuming site and circle events
    ProcessEvent,
    /// Draining the beachline after the last event
    EdgeFixup,
    /// Every edge has been clipped
    Done,
}

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepEvent {
    /// A site was consumed and its arc inserted
    Site(SiteId),
    /// An arc collapsed, emitting a vertex
    Circle(VertexId),
    /// A leftover beachline entry was removed and its edge finalized
    Fixup(EdgeId),
    /// Nothing left to do
    Finished,
}

/// Incremental sweep-line Voronoi builder
#[derive(Debug, Clone)]
pub struct Voronoi {
    sites: SiteList,
    beachline: Beachline,
    events: EventQueue,
    diagram: Diagram,
    bottom_site: SiteId,
    state: SweepState,
    steps: usize,
}

impl Voronoi {
    /// Prepare a sweep over `points` clipped to `bounds`
    ///
    /// Exact duplicate points collapse into one site. The lowest site seeds
    /// the beachline immediately.
    ///
    /// # Errors
    ///
    /// `NoSites` for empty input, `NonFiniteSite` for NaN/infinite points.
    pub fn new(points: &[DVec2], bounds: Bounds) -> Result<Self> {
        let mut sites = SiteList::new(points)?;
        let (storage, lookup) = sites.take_sites();
        let mut diagram = Diagram::new(bounds, storage, lookup);

        let bottom_site = sites.extract_min().ok_or(MapError::NoSites)?;
        diagram.plot_site(bottom_site);

        Ok(Self {
            sites,
            beachline: Beachline::new(),
            events: EventQueue::new(),
            diagram,
            bottom_site,
            state: SweepState::AwaitingStep,
            steps: 0,
        })
    }

    /// Build the complete diagram in one call
    pub fn compute(points: &[DVec2], bounds: Bounds) -> Result<Diagram> {
        let mut voronoi = Self::new(points, bounds)?;
        voronoi.run();
        Ok(voronoi.into_diagram())
    }

    #[inline]
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Number of steps taken so far
    #[inline]
    pub fn step_number(&self) -> usize {
        self.steps
    }

    /// Accumulated output so far
    #[inline]
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == SweepState::Done
    }

    /// Step until the sweep is done
    pub fn run(&mut self) {
        while !self.is_done() {
            self.step();
        }
        log::debug!(
            "Sweep finished in {} steps: {} sites, {} vertices, {} edges ({} visible)",
            self.steps,
            self.diagram.sites().len(),
            self.diagram.vertices().len(),
            self.diagram.edges().len(),
            self.diagram.segments().len()
        );
    }

    /// Advance by exactly one event
    ///
    /// Fresh flags on the accumulator only mark what this step produced.
    pub fn step(&mut self) -> SweepEvent {
        if self.state == SweepState::Done {
            return SweepEvent::Finished;
        }

        self.diagram.reset_fresh();
        self.steps += 1;

        if matches!(self.state, SweepState::AwaitingStep | SweepState::ProcessEvent) {
            self.state = SweepState::ProcessEvent;
            if let Some(event) = self.process_next_event() {
                return event;
            }
            self.state = SweepState::EdgeFixup;
        }

        self.fixup_step()
    }

    /// Pick the earlier of the next site and the next circle event
    fn process_next_event(&mut self) -> Option<SweepEvent> {
        let next_site = self
            .sites
            .peek()
            .map(|id| (id, self.diagram.site(id).position));
        let next_circle = self.events.min(&self.beachline);

        let take_site = match (next_site, next_circle) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some((_, s)), Some(c)) => {
                s.y < c.y || ((s.y - c.y).abs() < TOLERANCE && s.x < c.x)
            }
        };

        if take_site {
            let site = self.sites.extract_min()?;
            self.handle_site(site);
            log::trace!("step {}: site {}", self.steps, site);
            Some(SweepEvent::Site(site))
        } else {
            let vertex = self.handle_circle()?;
            log::trace!(
                "step {}: vertex {} at {:?}",
                self.steps,
                vertex,
                self.diagram.vertices()[vertex]
            );
            Some(SweepEvent::Circle(vertex))
        }
    }

    fn handle_site(&mut self, site: SiteId) {
        let position = self.diagram.site(site).position;
        self.diagram.plot_site(site);

        let lbnd = self.beachline.left_bound(position, &self.diagram);
        let rbnd = self.beachline.right_of(lbnd);
        let bot = self.beachline.right_region(lbnd, &self.diagram, self.bottom_site);

        // Split the arc above the site with two half-edges on a new bisector
        let edge = self.diagram.bisect(bot, site);
        let left_half = self.beachline.insert_after(lbnd, edge, Side::Left);

        if let Some(p) = self.intersect(lbnd, left_half) {
            self.events.delete(&mut self.beachline, lbnd);
            self.events
                .insert(&mut self.beachline, lbnd, p, p.distance(position));
        }

        let right_half = self.beachline.insert_after(left_half, edge, Side::Right);

        if let Some(p) = self.intersect(right_half, rbnd) {
            self.events
                .insert(&mut self.beachline, right_half, p, p.distance(position));
        }
    }

    fn handle_circle(&mut self) -> Option<VertexId> {
        let lbnd = self.events.extract_min()?;
        let llbnd = self.beachline.left_of(lbnd);
        let rbnd = self.beachline.right_of(lbnd);
        let rrbnd = self.beachline.right_of(rbnd);

        let mut bot = self.beachline.left_region(lbnd, &self.diagram, self.bottom_site);
        let mut top = self.beachline.right_region(rbnd, &self.diagram, self.bottom_site);
        let mid = self.beachline.right_region(lbnd, &self.diagram, self.bottom_site);
        self.diagram.plot_triple(bot, top, mid);

        let (left_edge, left_side, vertex, ystar) = {
            let node = self.beachline.get(lbnd);
            (node.edge?, node.side, node.vertex?, node.ystar)
        };
        let (right_edge, right_side) = {
            let node = self.beachline.get(rbnd);
            (node.edge?, node.side)
        };

        self.diagram.set_sweep_line(ystar);
        let v = self.diagram.plot_vertex(vertex);
        self.diagram.set_endpoint(left_edge, left_side, v);
        self.diagram.set_endpoint(right_edge, right_side, v);

        // The collapsed arc disappears with both of its boundaries
        self.beachline.delete(lbnd);
        self.events.delete(&mut self.beachline, rbnd);
        self.beachline.delete(rbnd);

        let mut side = Side::Left;
        if self.diagram.site(bot).position.y > self.diagram.site(top).position.y {
            std::mem::swap(&mut bot, &mut top);
            side = Side::Right;
        }

        let edge = self.diagram.bisect(bot, top);
        let bisector = self.beachline.insert_after(llbnd, edge, side);
        self.diagram.set_endpoint(edge, side.opposite(), v);

        let bot_position = self.diagram.site(bot).position;
        if let Some(p) = self.intersect(llbnd, bisector) {
            self.events.delete(&mut self.beachline, llbnd);
            self.events
                .insert(&mut self.beachline, llbnd, p, p.distance(bot_position));
        }
        if let Some(p) = self.intersect(bisector, rrbnd) {
            self.events
                .insert(&mut self.beachline, bisector, p, p.distance(bot_position));
        }

        Some(v)
    }

    /// Remove the leftmost interior half-edge, or finish when none remain
    fn fixup_step(&mut self) -> SweepEvent {
        let he = self.beachline.right_of(Beachline::LEFT_END);
        if he == Beachline::RIGHT_END {
            self.diagram.resolve_all();
            self.state = SweepState::Done;
            log::trace!("step {}: done", self.steps);
            return SweepEvent::Finished;
        }

        let edge = self.beachline.get(he).edge;
        self.beachline.delete(he);
        match edge {
            Some(edge) => {
                self.diagram.resolve_edge(edge);
                log::trace!("step {}: fixup edge {}", self.steps, edge);
                SweepEvent::Fixup(edge)
            }
            None => self.fixup_step(),
        }
    }

    fn intersect(&self, a: HalfEdgeId, b: HalfEdgeId) -> Option<DVec2> {
        let (na, nb) = (self.beachline.get(a), self.beachline.get(b));
        let (ea, eb) = (na.edge?, nb.edge?);
        intersect(
            &self.diagram.edge(ea).bisector,
            na.side,
            &self.diagram.edge(eb).bisector,
            nb.side,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn square(extent: f64) -> Bounds {
        Bounds::square(extent).unwrap()
    }

    fn random_points(count: usize, extent: f64, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| DVec2::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)))
            .collect()
    }

    #[test]
    fn test_three_sites_meet_at_one_vertex() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(5.0, 10.0),
        ];
        let diagram = Voronoi::compute(&points, square(10.0)).unwrap();

        assert_eq!(diagram.vertices().len(), 1);
        let v = diagram.vertices()[0];
        assert!((v.x - 5.0).abs() < 1e-9);
        assert!((v.y - 3.75).abs() < 1e-9);

        assert_eq!(diagram.edges().len(), 3);
        assert_eq!(diagram.segments().len(), 3);
        for segment in diagram.segments() {
            let touches = segment.p0.distance(v) < 1e-9 || segment.p1.distance(v) < 1e-9;
            assert!(touches, "segment {:?} misses the vertex", segment);
        }

        assert_eq!(diagram.triangles().len(), 1);
        let mut triple = diagram.triangles()[0].sites;
        triple.sort_unstable();
        assert_eq!(triple, [0, 1, 2]);
    }

    #[test]
    fn test_single_site_has_no_edges() {
        let diagram = Voronoi::compute(&[DVec2::new(5.0, 5.0)], square(10.0)).unwrap();
        assert!(diagram.edges().is_empty());
        assert!(diagram.vertices().is_empty());
        assert_eq!(diagram.emitted_sites(), &[0]);

        let polygon = diagram.region_polygon(0);
        assert_eq!(polygon.len(), 4);
    }

    #[test]
    fn test_euler_relation_holds() {
        for seed in 0..5 {
            let points = random_points(150, 100.0, seed);
            let diagram = Voronoi::compute(&points, square(100.0)).unwrap();

            let v = diagram.vertices().len() as i64;
            let e = diagram.edges().len() as i64;
            let f = diagram.sites().len() as i64;
            // One extra vertex at infinity closes the unbounded edges
            assert_eq!((v + 1) - e + f, 2, "seed {}", seed);
        }
    }

    #[test]
    fn test_collinear_sites_give_parallel_edges() {
        let points: Vec<DVec2> = (0..5).map(|i| DVec2::new(1.0 + 2.0 * i as f64, 5.0)).collect();
        let diagram = Voronoi::compute(&points, square(10.0)).unwrap();

        assert!(diagram.vertices().is_empty());
        assert_eq!(diagram.edges().len(), 4);
        assert_eq!(diagram.segments().len(), 4);
    }

    #[test]
    fn test_edges_have_two_sites_and_clip_inside_bounds() {
        let bounds = square(200.0);
        let points = random_points(300, 200.0, 42);
        let diagram = Voronoi::compute(&points, bounds).unwrap();

        for edge in diagram.edges() {
            assert_ne!(edge.regions[0], edge.regions[1]);
            assert!(edge.is_resolved());
            if let Some([p0, p1]) = edge.clipped {
                assert!(p0.is_finite() && p1.is_finite());
                assert!(bounds.contains(p0), "{:?} outside", p0);
                assert!(bounds.contains(p1), "{:?} outside", p1);
            }
        }
        assert_eq!(diagram.segments().len(), diagram.visible_edges().count());
    }

    #[test]
    fn test_stepping_matches_run() {
        let bounds = square(50.0);
        let points = random_points(60, 50.0, 7);
        let reference = Voronoi::compute(&points, bounds).unwrap();

        let mut voronoi = Voronoi::new(&points, bounds).unwrap();
        assert_eq!(voronoi.state(), SweepState::AwaitingStep);

        let mut sites = 0;
        let mut circles = 0;
        loop {
            match voronoi.step() {
                SweepEvent::Site(_) => sites += 1,
                SweepEvent::Circle(_) => circles += 1,
                SweepEvent::Fixup(_) => assert_eq!(voronoi.state(), SweepState::EdgeFixup),
                SweepEvent::Finished => break,
            }
        }
        assert!(voronoi.is_done());
        assert_eq!(voronoi.step(), SweepEvent::Finished);

        let diagram = voronoi.diagram();
        assert_eq!(sites + 1, diagram.sites().len());
        assert_eq!(circles, diagram.vertices().len());
        assert_eq!(diagram.vertices(), reference.vertices());
        assert_eq!(diagram.emitted_sites(), reference.emitted_sites());
        let ours: Vec<_> = diagram.segments().iter().map(|s| (s.edge, s.p0, s.p1)).collect();
        let theirs: Vec<_> = reference.segments().iter().map(|s| (s.edge, s.p0, s.p1)).collect();
        assert_eq!(ours, theirs);
    }

    #[test]
    fn test_fresh_flags_cover_only_the_last_step() {
        let points = random_points(40, 100.0, 17);
        let mut voronoi = Voronoi::new(&points, square(100.0)).unwrap();
        let mut circle_segments = 0;
        let mut fixup_segments = 0;

        while !voronoi.is_done() {
            let (segments_before, triangles_before) = (
                voronoi.diagram().segments().len(),
                voronoi.diagram().triangles().len(),
            );
            let event = voronoi.step();
            let diagram = voronoi.diagram();

            // Exactly what this step appended is fresh; everything older was cleared
            for (i, segment) in diagram.segments().iter().enumerate() {
                assert_eq!(segment.fresh, i >= segments_before, "{:?}", event);
            }
            for (i, triangle) in diagram.triangles().iter().enumerate() {
                assert_eq!(triangle.fresh, i >= triangles_before, "{:?}", event);
            }

            let added = diagram.segments().len() - segments_before;
            match event {
                SweepEvent::Site(_) => {
                    assert_eq!(added, 0);
                    assert_eq!(diagram.triangles().len(), triangles_before);
                }
                SweepEvent::Circle(_) => {
                    assert_eq!(diagram.triangles().len(), triangles_before + 1);
                    circle_segments += added;
                }
                SweepEvent::Fixup(edge) => {
                    assert!(added <= 1);
                    if added == 1 {
                        assert_eq!(diagram.segments()[segments_before].edge, edge);
                    }
                    fixup_segments += added;
                }
                SweepEvent::Finished => {}
            }
        }

        assert!(circle_segments > 0);
        assert!(fixup_segments > 0);

        let segments = voronoi.diagram().segments().len();
        assert_eq!(voronoi.step(), SweepEvent::Finished);
        assert_eq!(voronoi.diagram().segments().len(), segments);
    }

    #[test]
    fn test_cocircular_sites_give_true_voronoi_edges() {
        let bounds = square(100.0);
        let centre = DVec2::new(50.0, 50.0);

        for n in [4, 6, 8, 12] {
            let mut points: Vec<DVec2> = (0..n)
                .map(|i| {
                    let angle = std::f64::consts::TAU * i as f64 / n as f64;
                    centre + 30.0 * DVec2::new(angle.cos(), angle.sin())
                })
                .collect();
            points.push(centre);

            let diagram = Voronoi::compute(&points, bounds).unwrap();
            assert!(diagram.visible_edges().count() >= n);

            // Every edge midpoint is equidistant from its two sites and no
            // other site is closer
            for edge in diagram.visible_edges() {
                let [p0, p1] = edge.clipped.unwrap();
                let mid = (p0 + p1) * 0.5;
                let [a, b] = edge.regions;
                let da = mid.distance(diagram.site(a).position);
                let db = mid.distance(diagram.site(b).position);
                assert!((da - db).abs() < 1e-6, "n={} edge {}: {} vs {}", n, edge.id, da, db);

                let nearest = diagram
                    .sites()
                    .iter()
                    .map(|s| mid.distance(s.position))
                    .fold(f64::INFINITY, f64::min);
                assert!(nearest >= da - 1e-6, "n={} edge {} is not a Voronoi edge", n, edge.id);
            }
        }
    }

    #[test]
    fn test_sweep_line_is_monotone() {
        let points = random_points(80, 100.0, 3);
        let mut voronoi = Voronoi::new(&points, square(100.0)).unwrap();
        let mut previous = voronoi.diagram().sweep_line();
        while !voronoi.is_done() {
            voronoi.step();
            let current = voronoi.diagram().sweep_line();
            assert!(current >= previous - 1e-9);
            previous = current;
        }
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        assert_eq!(
            Voronoi::new(&[], square(10.0)).unwrap_err(),
            MapError::NoSites
        );
        assert!(Voronoi::new(&[DVec2::new(f64::INFINITY, 1.0)], square(10.0)).is_err());
    }
}
