use std::collections::VecDeque;

use bitvec::vec::BitVec;

use super::{QuadNode, QuadTree};

/// Pre-order traversal; children are visited top-left first.
pub struct DepthFirst<'a> {
	stack: Vec<&'a QuadNode>,
}

impl<'a> Iterator for DepthFirst<'a> {
	type Item = &'a QuadNode;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.stack.pop()?;
		if let Some(children) = node.children() {
			self.stack.extend(children.iter().rev());
		}
		Some(node)
	}
}

/// Level-order traversal, the order in which the animation draws nodes.
pub struct BreadthFirst<'a> {
	queue: VecDeque<&'a QuadNode>,
}

impl<'a> Iterator for BreadthFirst<'a> {
	type Item = &'a QuadNode;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.queue.pop_front()?;
		if let Some(children) = node.children() {
			self.queue.extend(children.iter());
		}
		Some(node)
	}
}

impl QuadNode {
	pub fn depth_first(&self) -> DepthFirst<'_> {
		DepthFirst { stack: vec![self] }
	}

	pub fn breadth_first(&self) -> BreadthFirst<'_> {
		BreadthFirst { queue: VecDeque::from([self]) }
	}

	/// Leaf nodes in depth-first order.
	pub fn leaves(&self) -> impl Iterator<Item = &QuadNode> + '_ {
		self.depth_first().filter(|n| n.is_leaf())
	}

	/// Number of levels below and including this node; a lone leaf has
	/// depth 1.
	pub fn depth(&self) -> usize {
		let mut deepest = 0;
		let mut stack = vec![(self, 1)];
		while let Some((node, depth)) = stack.pop() {
			deepest = deepest.max(depth);
			if let Some(children) = node.children() {
				stack.extend(children.iter().map(|c| (c, depth + 1)));
			}
		}
		deepest
	}
}

impl QuadTree {
	pub fn depth_first(&self) -> DepthFirst<'_> {
		self.root().depth_first()
	}

	pub fn breadth_first(&self) -> BreadthFirst<'_> {
		self.root().breadth_first()
	}

	pub fn leaves(&self) -> impl Iterator<Item = &QuadNode> + '_ {
		self.root().leaves()
	}

	pub fn leaf_count(&self) -> usize {
		self.leaves().count()
	}

	pub fn depth(&self) -> usize {
		self.root().depth()
	}

	/// Checks that the leaves cover the root rectangle exactly once: no
	/// leaf pokes outside it, no pixel is covered twice, none is missed.
	pub fn covers_exactly(&self) -> bool {
		let bounds = self.bounds();
		let stride = bounds.width as usize;
		let mut covered: BitVec = BitVec::repeat(false, bounds.area() as usize);
		for leaf in self.leaves() {
			let rect = leaf.rect();
			if rect.x < bounds.x || rect.y < bounds.y
				|| rect.x as u64 + rect.width as u64 > bounds.x as u64 + bounds.width as u64
				|| rect.y as u64 + rect.height as u64 > bounds.y as u64 + bounds.height as u64 {
				return false;
			}
			for row in rect.y - bounds.y..rect.y - bounds.y + rect.height {
				for col in rect.x - bounds.x..rect.x - bounds.x + rect.width {
					let ind = row as usize * stride + col as usize;
					if covered[ind] {
						return false;
					}
					covered.set(ind, true);
				}
			}
		}
		covered.all()
	}
}

#[cfg(test)]
mod tests {
	use super::super::buffer::Color;
	use super::super::Rect;
	use super::*;

	const BLACK: Color = image::Rgb([0, 0, 0]);

	fn leaf(x: u32, y: u32, w: u32, h: u32) -> QuadNode {
		QuadNode::Leaf { rect: Rect::new(x, y, w, h), color: BLACK }
	}

	fn branch(rect: Rect, children: [QuadNode; 4]) -> QuadNode {
		QuadNode::Branch { rect, color: BLACK, children: Box::new(children) }
	}

	fn sample() -> QuadNode {
		// 4x4 whose top-right quadrant is split again.
		branch(Rect::new(0, 0, 4, 4), [
			leaf(0, 0, 2, 2),
			branch(Rect::new(2, 0, 2, 2), [
				leaf(2, 0, 1, 1),
				leaf(3, 0, 1, 1),
				leaf(2, 1, 1, 1),
				leaf(3, 1, 1, 1),
			]),
			leaf(0, 2, 2, 2),
			leaf(2, 2, 2, 2),
		])
	}

	#[test]
	fn depth_first_is_preorder() {
		let root = sample();
		let order: Vec<_> = root.depth_first().map(|n| n.rect()).collect();
		assert_eq!(order[0], Rect::new(0, 0, 4, 4));
		assert_eq!(order[1], Rect::new(0, 0, 2, 2));
		assert_eq!(order[2], Rect::new(2, 0, 2, 2));
		assert_eq!(order[3], Rect::new(2, 0, 1, 1));
		assert_eq!(order[7], Rect::new(0, 2, 2, 2));
		assert_eq!(order.len(), 9);
	}

	#[test]
	fn breadth_first_is_level_order() {
		let root = sample();
		let order: Vec<_> = root.breadth_first().map(|n| n.rect()).collect();
		assert_eq!(order[4], Rect::new(2, 2, 2, 2));
		assert_eq!(order[5], Rect::new(2, 0, 1, 1));
		assert_eq!(order.len(), 9);
	}

	#[test]
	fn leaves_and_depth() {
		let root = sample();
		assert_eq!(root.leaves().count(), 7);
		assert_eq!(root.depth(), 3);
		assert_eq!(leaf(0, 0, 1, 1).depth(), 1);
	}

	#[test]
	fn coverage_detects_overlap_and_gaps() {
		let tree = |root| QuadTree {
			root,
			node_count: 0,
			tolerance: Default::default(),
			mode: Default::default(),
		};
		assert!(tree(sample()).covers_exactly());

		// The literal odd-size split with a narrow top-right quadrant
		// overlaps on the bottom row and misses a pixel on the top row.
		let naive = branch(Rect::new(0, 0, 3, 3), [
			leaf(0, 0, 1, 1),
			leaf(1, 0, 1, 1),
			leaf(0, 1, 2, 2),
			leaf(1, 1, 2, 2),
		]);
		assert!(!tree(naive).covers_exactly());

		let outside = branch(Rect::new(0, 0, 2, 2), [
			leaf(0, 0, 1, 1),
			leaf(1, 0, 1, 1),
			leaf(0, 1, 1, 1),
			leaf(1, 1, 2, 1),
		]);
		assert!(!tree(outside).covers_exactly());
	}
}
