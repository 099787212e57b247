//! Border tracing for connected components
//!
//! Follows the outer border of each 8-connected component of a binary
//! image, producing one closed [`Contour`] per component. The search for
//! the next border pixel turns clockwise (in image coordinates) from the
//! direction the previous pixel was entered from.

use crate::conncomp::{ConnectivityType, find_connected_components};
use crate::error::{RegionResult, check_binary};
use chartdig_core::{Contour, Pix, PixelPoint};

/// Direction for border traversal (8-connected, clockwise from West)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// West (-1, 0)
    West = 0,
    /// Northwest (-1, -1)
    NorthWest = 1,
    /// North (0, -1)
    North = 2,
    /// Northeast (1, -1)
    NorthEast = 3,
    /// East (1, 0)
    East = 4,
    /// Southeast (1, 1)
    SouthEast = 5,
    /// South (0, 1)
    South = 6,
    /// Southwest (-1, 1)
    SouthWest = 7,
}

impl Direction {
    /// Get the x offset for this direction
    #[inline]
    pub fn dx(self) -> i32 {
        XPOSTAB[self as usize]
    }

    /// Get the y offset for this direction
    #[inline]
    pub fn dy(self) -> i32 {
        YPOSTAB[self as usize]
    }

    /// Get direction from x,y offsets
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        if dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
            return None;
        }
        let idx = DIRTAB[(1 + dy) as usize][(1 + dx) as usize];
        usize::try_from(idx).ok().map(Self::from_index)
    }

    #[inline]
    fn from_index(idx: usize) -> Self {
        match idx % 8 {
            0 => Direction::West,
            1 => Direction::NorthWest,
            2 => Direction::North,
            3 => Direction::NorthEast,
            4 => Direction::East,
            5 => Direction::SouthEast,
            6 => Direction::South,
            _ => Direction::SouthWest,
        }
    }
}

/// X offset for each direction
const XPOSTAB: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

/// Y offset for each direction
const YPOSTAB: [i32; 8] = [0, -1, -1, -1, 0, 1, 1, 1];

/// Direction lookup table: DIRTAB[1+dy][1+dx] gives direction index
const DIRTAB: [[i32; 3]; 3] = [[1, 2, 3], [0, -1, 4], [7, 6, 5]];

/// Search start for the next step, indexed by the direction just taken.
///
/// Points back at a background neighbor of the new pixel.
const QPOSTAB: [usize; 8] = [6, 6, 0, 0, 2, 2, 4, 4];

/// Find the next border pixel clockwise from `qpos`.
///
/// Returns the next pixel and the updated search start.
fn next_border_pixel(pix: &Pix, p: PixelPoint, qpos: usize) -> Option<(PixelPoint, usize)> {
    (1..8).map(|i| (qpos + i) % 8).find_map(|pos| {
        let np = p.offset(XPOSTAB[pos], YPOSTAB[pos]);
        pix.is_set(np.x, np.y).then_some((np, QPOSTAB[pos]))
    })
}

/// Trace the outer border of the component containing `start`.
///
/// `start` must be the first pixel of its component in raster order, so
/// its west neighbor is background. An isolated pixel yields a
/// single-point contour.
pub fn trace_outer_border(pix: &Pix, start: PixelPoint) -> RegionResult<Contour> {
    check_binary(pix)?;
    let mut points = vec![start];

    let Some((second, mut qpos)) = next_border_pixel(pix, start, 0) else {
        return Ok(Contour::new(points));
    };

    let mut p = second;
    // The border is closed when the first step would be repeated
    while let Some((np, q)) = next_border_pixel(pix, p, qpos) {
        if p == start && np == second {
            break;
        }
        points.push(p);
        p = np;
        qpos = q;
    }

    Ok(Contour::new(points))
}

/// Get outer borders for all 8-connected components
///
/// Contours are returned in raster order of each component's first pixel.
pub fn get_outer_borders(pix: &Pix) -> RegionResult<Vec<Contour>> {
    let components = find_connected_components(pix, ConnectivityType::EightWay)?;
    components
        .iter()
        .map(|c| trace_outer_border(pix, c.seed))
        .collect()
}

/// Convert border points to chain code representation
///
/// Consecutive points must be 8-neighbors; other steps are skipped.
pub fn to_chain_code(points: &[PixelPoint]) -> Vec<Direction> {
    points
        .windows(2)
        .filter_map(|w| Direction::from_offset(w[1].x - w[0].x, w[1].y - w[0].y))
        .collect()
}
