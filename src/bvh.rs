use crate::{primitives::AABB, Hit, Intersect, Ray};
use glam::Vec3;
use log::{debug, warn};
use smallvec::SmallVec;

/// How many primitives a leaf may hold before a split is forced
const SPLIT_THRESHOLD: usize = 8;
/// Number of SAH buckets along the split axis
const BUCKETS: usize = 12;
/// Relative cost of traversing a node compared to intersecting a primitive
const TRAVERSAL_COST: f32 = 0.125;

#[derive(Clone, Copy, Debug)]
pub enum Axis {
    X,
    Y,
    Z,
}

trait GetAxis {
    type Output;

    fn axis(&self, axis: Axis) -> Self::Output;
}

impl GetAxis for Vec3 {
    type Output = f32;

    fn axis(&self, axis: Axis) -> Self::Output {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// A Bounding Volume Hierarchy over any kind of primitive.
/// An empty hierarchy is valid and intersects nothing.
pub struct BVH<T> {
    /// The primitives, ordered so every leaf covers a contiguous range
    geometry: Vec<T>,
    /// The BVH tree, root first
    tree: Vec<FlatNode>,
}

impl<T: Intersect> BVH<T> {
    pub fn new(geometry: Vec<T>) -> Self {
        // Precompute build info about the geometry
        let mut build_geometry = geometry
            .iter()
            .enumerate()
            .filter_map(|(index, geom)| match geom.bounds() {
                Some(bounds) => Some(GeometryInfo {
                    index,
                    center: bounds.center(),
                    bounds,
                }),
                None => {
                    warn!("Primitive {} has no bounds and is left out of the BVH", index);
                    None
                }
            })
            .collect::<Vec<_>>();

        if build_geometry.is_empty() {
            return Self {
                geometry: Vec::new(),
                tree: Vec::new(),
            };
        }

        let mut total_nodes = 0;
        // Convert from node index to geometry index, and use this to sort the geometry later
        let mut index_to_geometry = Vec::with_capacity(build_geometry.len());
        let root = Self::build(&mut build_geometry, &mut index_to_geometry, &mut total_nodes);

        // Make a flat tree of FlatNodes from the root node of a BuildNode tree
        let tree = Self::flatten(root, total_nodes);

        // Sort the geometry by the indices in index_to_geometry
        let mut slots = geometry.into_iter().map(Some).collect::<Vec<_>>();
        let geometry = index_to_geometry
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        debug!("Total Nodes Built: {}", total_nodes);

        Self { geometry, tree }
    }

    fn build(
        geometry: &mut [GeometryInfo],
        index_to_geometry: &mut Vec<usize>,
        total_nodes: &mut usize,
    ) -> BuildNode {
        *total_nodes += 1;

        // Create bounding box for all geometry in this BuildNode
        let bounds = geometry
            .iter()
            .fold(AABB::default(), |b, g| b.union(g.bounds));

        // Check if we are a leaf
        if geometry.len() == 1 {
            return Self::build_leaf(geometry, index_to_geometry, bounds);
        }

        // Create centroids for all geometry in this BuildNode
        let centroids = geometry
            .iter()
            .fold(AABB::default(), |b, g| b.point_union(g.center));

        // Decide which axis to split the scene along
        let split_axis = centroids.max_extent();
        let axis_min = centroids.min.axis(split_axis);
        let axis_extent = centroids.max.axis(split_axis) - axis_min;

        let mid = if axis_extent <= 0.0 {
            // Every centroid in the same spot, buckets can't tell them apart
            if geometry.len() <= SPLIT_THRESHOLD {
                return Self::build_leaf(geometry, index_to_geometry, bounds);
            }
            geometry.len() / 2
        } else {
            let bucket_of = |g: &GeometryInfo| {
                let b = ((g.center.axis(split_axis) - axis_min) / axis_extent * BUCKETS as f32)
                    as usize;
                b.min(BUCKETS - 1)
            };

            // SAH guided partitioning
            let mut buckets = [SAHBucket::default(); BUCKETS];
            for g in geometry.iter() {
                let bucket = &mut buckets[bucket_of(g)];
                bucket.count += 1;
                bucket.bounds = bucket.bounds.union(g.bounds);
            }

            let mut cost = [0.0; BUCKETS - 1];
            for (i, c) in cost.iter_mut().enumerate() {
                let left = buckets.iter().take(i + 1).fold(SAHBucket::default(), SAHBucket::merge);
                let right = buckets.iter().skip(i + 1).fold(SAHBucket::default(), SAHBucket::merge);

                *c = TRAVERSAL_COST + (left.cost() + right.cost()) / bounds.surface_area();
            }

            let (min_bucket, min_cost) = cost.iter().enumerate().fold(
                (0, std::f32::INFINITY),
                |(pi, pc), (i, &c)| if c < pc { (i, c) } else { (pi, pc) },
            );

            // Check if we should build an interior node based on cost and the split threshold
            if geometry.len() <= SPLIT_THRESHOLD && min_cost >= geometry.len() as f32 {
                return Self::build_leaf(geometry, index_to_geometry, bounds);
            }

            // Geometry at or left of the chosen bucket goes first
            geometry.sort_unstable_by_key(|g| bucket_of(g) > min_bucket);
            let mid = geometry
                .iter()
                .position(|g| bucket_of(g) > min_bucket)
                .unwrap_or(0);

            if mid == 0 || mid == geometry.len() {
                geometry.len() / 2
            } else {
                mid
            }
        };

        let left = Box::new(Self::build(
            &mut geometry[..mid],
            index_to_geometry,
            total_nodes,
        ));
        let right = Box::new(Self::build(
            &mut geometry[mid..],
            index_to_geometry,
            total_nodes,
        ));
        BuildNode::interior(left, right)
    }

    fn build_leaf(
        geometry: &mut [GeometryInfo],
        index_to_geometry: &mut Vec<usize>,
        bounds: AABB,
    ) -> BuildNode {
        let geometry_offset = index_to_geometry.len();
        index_to_geometry.extend(geometry.iter().map(|g| g.index));
        BuildNode::leaf(bounds, geometry_offset, geometry.len())
    }

    fn flatten(root: BuildNode, size: usize) -> Vec<FlatNode> {
        let mut tree = Vec::with_capacity(size);
        Self::flatten_impl(root, &mut tree);

        tree
    }

    fn flatten_impl(node: BuildNode, tree: &mut Vec<FlatNode>) -> usize {
        let offset = tree.len();
        match node.inner {
            BuildNodeInner::Interior { left, right } => {
                tree.push(FlatNode::interior(node.bounds, 0, 0));
                let left_idx = Self::flatten_impl(*left, tree);
                let right_idx = Self::flatten_impl(*right, tree);
                if let FlatNodeInner::Interior {
                    ref mut left,
                    ref mut right,
                } = tree[offset].inner
                {
                    *left = left_idx;
                    *right = right_idx;
                }
            }
            BuildNodeInner::Leaf {
                geometry_offset,
                num_primitives,
            } => {
                tree.push(FlatNode::leaf(node.bounds, geometry_offset, num_primitives));
            }
        }

        offset
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Leaves whose bounds the ray touches, in traversal order.
    fn leaves<'a>(
        &'a self,
        ray: Ray,
        t_min: f32,
        t_max: impl Fn() -> f32 + 'a,
    ) -> impl Iterator<Item = &'a [T]> + 'a
    where
        T: 'a,
    {
        let mut stack: SmallVec<[usize; 64]> = SmallVec::new();
        if !self.tree.is_empty() {
            stack.push(0);
        }

        std::iter::from_fn(move || {
            while let Some(index) = stack.pop() {
                let node = &self.tree[index];
                if !node.bounds.has_intersection(ray, t_min, t_max()) {
                    continue;
                }

                match node.inner {
                    FlatNodeInner::Interior { left, right } => {
                        stack.push(right);
                        stack.push(left);
                    }
                    FlatNodeInner::Leaf {
                        geometry_offset,
                        num_primitives,
                    } => {
                        return Some(
                            &self.geometry[geometry_offset..geometry_offset + num_primitives],
                        );
                    }
                }
            }

            None
        })
    }
}

impl<T: Intersect> Intersect for BVH<T> {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let closest = std::cell::Cell::new(t_max);
        let mut hit = None;

        // Find the closest intersection, shrinking the range as we go
        for leaf in self.leaves(ray, t_min, || closest.get()) {
            for primitive in leaf {
                if let Some(h) = primitive.intersection(ray, t_min, closest.get()) {
                    closest.set(h.t);
                    hit = Some(h);
                }
            }
        }

        hit
    }

    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.leaves(ray, t_min, move || t_max).any(|leaf| {
            leaf.iter()
                .any(|primitive| primitive.has_intersection(ray, t_min, t_max))
        })
    }

    fn bounds(&self) -> Option<AABB> {
        self.tree.first().map(|node| node.bounds)
    }
}

struct GeometryInfo {
    index: usize,
    center: Vec3,
    bounds: AABB,
}

#[derive(Copy, Clone, Debug, Default)]
struct SAHBucket {
    count: usize,
    bounds: AABB,
}

impl SAHBucket {
    fn merge(mut self, other: &SAHBucket) -> Self {
        self.bounds = self.bounds.union(other.bounds);
        self.count += other.count;
        self
    }

    fn cost(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.count as f32 * self.bounds.surface_area()
        }
    }
}

#[derive(Debug)]
enum BuildNodeInner {
    Interior {
        left: Box<BuildNode>,
        right: Box<BuildNode>,
    },
    Leaf {
        geometry_offset: usize,
        num_primitives: usize,
    },
}

#[derive(Debug)]
struct BuildNode {
    bounds: AABB,
    inner: BuildNodeInner,
}

impl BuildNode {
    fn interior(left: Box<BuildNode>, right: Box<BuildNode>) -> Self {
        let bounds = left.bounds.union(right.bounds);

        Self {
            bounds,
            inner: BuildNodeInner::Interior { left, right },
        }
    }

    fn leaf(bounds: AABB, geometry_offset: usize, num_primitives: usize) -> Self {
        Self {
            bounds,
            inner: BuildNodeInner::Leaf {
                geometry_offset,
                num_primitives,
            },
        }
    }
}

#[derive(Debug)]
enum FlatNodeInner {
    Interior {
        left: usize,
        right: usize,
    },
    Leaf {
        geometry_offset: usize,
        num_primitives: usize,
    },
}

#[derive(Debug)]
struct FlatNode {
    bounds: AABB,
    inner: FlatNodeInner,
}

impl FlatNode {
    fn interior(bounds: AABB, left: usize, right: usize) -> Self {
        Self {
            bounds,
            inner: FlatNodeInner::Interior { left, right },
        }
    }

    fn leaf(bounds: AABB, geometry_offset: usize, num_primitives: usize) -> Self {
        Self {
            bounds,
            inner: FlatNodeInner::Leaf {
                geometry_offset,
                num_primitives,
            },
        }
    }
}
