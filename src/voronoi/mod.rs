//! Planar Voronoi diagrams by Fortune's sweep
//!
//! Build order, leaves first: [`geometry`] (bisectors, intersections,
//! rectangle), [`sites`] (sorted site source), [`beachline`] (arena linked
//! list of half-edges), [`events`] (circle-event queue), [`diagram`]
//! (accumulator and clipping), [`sweep`] (state machine). [`delaunay`]
//! derives triangulation, hull and spanning-tree views of a finished diagram.

pub mod beachline;
pub mod clip;
pub mod delaunay;
pub mod diagram;
pub mod events;
pub mod geometry;
pub mod sites;
pub mod sweep;

pub use clip::clip_segment;
pub use delaunay::{DelaunayLine, SpanningTreeKind};
pub use diagram::{Diagram, Edge, EdgeId, Segment, Triangle, VertexId};
pub use geometry::{Bisector, Bounds, Line, Side, TOLERANCE};
pub use sites::{Site, SiteId};
pub use sweep::{SweepEvent, SweepState, Voronoi};
