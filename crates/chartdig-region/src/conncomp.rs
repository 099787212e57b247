//! Connected component analysis
//!
//! This module provides functions for finding and labeling connected components
//! in binary images. It uses Union-Find (disjoint set) data structure for
//! efficient labeling.

use crate::error::{RegionResult, check_binary};
use chartdig_core::{Pix, PixMut, PixelDepth, PixelPoint};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

/// Inclusive pixel bounds of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl ComponentBounds {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// A connected component in an image
#[derive(Debug, Clone)]
pub struct ConnectedComponent {
    /// Label, starting at 1 in raster order of first pixels
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: ComponentBounds,
    /// First pixel of the component in raster order
    pub seed: PixelPoint,
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // index 0 is the background label
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // keep the smaller root so labels follow raster order
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Label all connected components in a binary image
///
/// Returns a 32 bpp image where each foreground pixel holds the label of
/// its component (1, 2, ... in raster order of first pixels) and
/// background pixels hold 0.
pub fn label_connected_components(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    check_binary(pix)?;
    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let mut provisional = vec![0u32; w * h];
    let mut uf = UnionFind::new();

    for y in 0..h {
        for x in 0..w {
            if pix.get_pixel_unchecked(x as u32, y as u32) == 0 {
                continue;
            }
            let mut neighbors = [0u32; 4];
            let mut n = 0;
            if x > 0 {
                neighbors[n] = provisional[y * w + x - 1];
                n += 1;
            }
            if y > 0 {
                neighbors[n] = provisional[(y - 1) * w + x];
                n += 1;
                if connectivity == ConnectivityType::EightWay {
                    if x > 0 {
                        neighbors[n] = provisional[(y - 1) * w + x - 1];
                        n += 1;
                    }
                    if x + 1 < w {
                        neighbors[n] = provisional[(y - 1) * w + x + 1];
                        n += 1;
                    }
                }
            }

            let mut label = 0;
            for &nb in neighbors[..n].iter().filter(|&&l| l != 0) {
                if label == 0 {
                    label = nb;
                } else {
                    uf.union(label, nb);
                }
            }
            if label == 0 {
                label = uf.make();
            }
            provisional[y * w + x] = label;
        }
    }

    // Resolve roots and renumber densely in raster order
    let mut dense = vec![0u32; uf.parent.len()];
    let mut next = 0u32;
    let mut out = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit32)?;
    for y in 0..h {
        for x in 0..w {
            let p = provisional[y * w + x];
            if p == 0 {
                continue;
            }
            let root = uf.find(p) as usize;
            if dense[root] == 0 {
                next += 1;
                dense[root] = next;
            }
            out.set_pixel_unchecked(x as u32, y as u32, dense[root]);
        }
    }

    Ok(out.into())
}

/// Find all connected components in a binary image
///
/// Components are returned in label order, i.e. raster order of their
/// first pixel.
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    let labeled = label_connected_components(pix, connectivity)?;
    let mut components: Vec<ConnectedComponent> = Vec::new();

    for y in 0..labeled.height() {
        for x in 0..labeled.width() {
            let label = labeled.get_pixel_unchecked(x, y);
            if label == 0 {
                continue;
            }
            let idx = label as usize - 1;
            if idx == components.len() {
                components.push(ConnectedComponent {
                    label,
                    pixel_count: 0,
                    bounds: ComponentBounds {
                        min_x: x,
                        min_y: y,
                        max_x: x,
                        max_y: y,
                    },
                    seed: PixelPoint::new(x as i32, y as i32),
                });
            }
            let c = &mut components[idx];
            c.pixel_count += 1;
            c.bounds.min_x = c.bounds.min_x.min(x);
            c.bounds.max_x = c.bounds.max_x.max(x);
            c.bounds.max_y = y;
        }
    }

    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(w: u32, h: u32, on: &[(u32, u32)]) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
        for &(x, y) in on {
            pm.set_pixel(x, y, 1).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_diagonal_connectivity() {
        let pix = binary(4, 4, &[(0, 0), (1, 1), (2, 2)]);
        assert_eq!(
            find_connected_components(&pix, ConnectivityType::FourWay)
                .unwrap()
                .len(),
            3
        );
        let eight = find_connected_components(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(eight.len(), 1);
        assert_eq!(eight[0].pixel_count, 3);
        assert_eq!(eight[0].bounds.width(), 3);
    }

    #[test]
    fn test_u_shape_merges_into_one_label() {
        // two arms joined at the bottom: provisional labels must merge
        let pix = binary(5, 3, &[(0, 0), (4, 0), (0, 1), (4, 1), (0, 2), (1, 2), (2, 2), (3, 2), (4, 2)]);
        let comps = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].pixel_count, 9);
        assert_eq!(comps[0].seed, PixelPoint::new(0, 0));
        let labeled = label_connected_components(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(labeled.get_pixel(4, 0), Some(1));
    }

    #[test]
    fn test_requires_binary() {
        let pix = Pix::new(3, 3, PixelDepth::Bit8).unwrap();
        assert!(find_connected_components(&pix, ConnectivityType::FourWay).is_err());
    }
}
