use crate::avl_tree::node::Node;
use crate::avl_tree::{Error, Result};
use crate::entry::Entry;
use std::cmp::Ordering;
use std::mem;

pub type Tree<T, U> = Option<Box<Node<T, U>>>;

pub fn height<T, U>(tree: &Tree<T, U>) -> usize {
    match tree {
        None => 0,
        Some(ref node) => node.height,
    }
}

fn rotate_left<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = match node.right.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.right = child.left.take();
    node.update_height();
    child.left = Some(node);
    child.update_height();
    child
}

fn rotate_right<T, U>(mut node: Box<Node<T, U>>) -> Box<Node<T, U>> {
    let mut child = match node.left.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    node.left = child.right.take();
    node.update_height();
    child.right = Some(node);
    child.update_height();
    child
}

// `branch` is how the inserted key compared against the key of the child that was descended
// into. An insertion unbalances at most one ancestor, and the rotation case at that ancestor
// is selected by comparing the inserted key against the heavy child.
fn rebalance_after_insert<T, U>(tree: &mut Tree<T, U>, branch: Ordering) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update_height();

    if node.balance_factor() > 1 {
        match branch {
            Ordering::Less => {
                debug!("left-left imbalance: applying single right rotation");
                node = rotate_right(node);
            },
            Ordering::Greater => {
                debug!("left-right imbalance: applying double rotation");
                let child = match node.left.take() {
                    Some(child) => child,
                    None => unreachable!(),
                };
                node.left = Some(rotate_left(child));
                node = rotate_right(node);
            },
            Ordering::Equal => unreachable!(),
        }
    } else if node.balance_factor() < -1 {
        match branch {
            Ordering::Greater => {
                debug!("right-right imbalance: applying single left rotation");
                node = rotate_left(node);
            },
            Ordering::Less => {
                debug!("right-left imbalance: applying double rotation");
                let child = match node.right.take() {
                    Some(child) => child,
                    None => unreachable!(),
                };
                node.right = Some(rotate_right(child));
                node = rotate_left(node);
            },
            Ordering::Equal => unreachable!(),
        }
    }

    *tree = Some(node);
}

// Unlike insertion, a removal can leave every ancestor up to the root unbalanced, and the
// removed key says nothing about the shape of the surviving subtrees. The rotation case is
// selected by the balance factor of the heavy child instead.
fn rebalance_after_removal<T, U>(tree: &mut Tree<T, U>) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update_height();

    if node.balance_factor() > 1 {
        if let Some(child) = node.left.take() {
            if child.balance_factor() < 0 {
                debug!("left-right imbalance: applying double rotation");
                node.left = Some(rotate_left(child));
            } else {
                debug!("left-left imbalance: applying single right rotation");
                node.left = Some(child);
            }
        }
        node = rotate_right(node);
    } else if node.balance_factor() < -1 {
        if let Some(child) = node.right.take() {
            if child.balance_factor() > 0 {
                debug!("right-left imbalance: applying double rotation");
                node.right = Some(rotate_right(child));
            } else {
                debug!("right-right imbalance: applying single left rotation");
                node.right = Some(child);
            }
        }
        node = rotate_left(node);
    }

    *tree = Some(node);
}

pub fn insert<T, U>(tree: &mut Tree<T, U>, new_node: Node<T, U>) -> Result<Ordering>
where
    T: Ord,
{
    let (ord, branch) = match tree {
        Some(ref mut node) => {
            let ord = new_node.entry.key.cmp(&node.entry.key);
            let branch = match ord {
                Ordering::Less => insert(&mut node.left, new_node)?,
                Ordering::Greater => insert(&mut node.right, new_node)?,
                Ordering::Equal => return Err(Error::DuplicateKey),
            };
            (ord, branch)
        },
        None => {
            *tree = Some(Box::new(new_node));
            return Ok(Ordering::Equal);
        },
    };

    rebalance_after_insert(tree, branch);
    Ok(ord)
}

// precondition: the tree is non-empty
fn remove_min<T, U>(tree: &mut Tree<T, U>) -> Entry<T, U> {
    let entry = match tree {
        Some(ref mut node) if node.left.is_some() => remove_min(&mut node.left),
        _ => {
            let mut node = match tree.take() {
                Some(node) => node,
                None => unreachable!(),
            };
            *tree = node.right.take();
            return node.entry;
        },
    };
    rebalance_after_removal(tree);
    entry
}

pub fn remove<T, U>(tree: &mut Tree<T, U>, key: &T) -> Option<Entry<T, U>>
where
    T: Ord,
{
    let ret = match tree.take() {
        Some(mut node) => match key.cmp(&node.entry.key) {
            Ordering::Less => {
                let ret = remove(&mut node.left, key);
                *tree = Some(node);
                ret
            },
            Ordering::Greater => {
                let ret = remove(&mut node.right, key);
                *tree = Some(node);
                ret
            },
            Ordering::Equal => {
                if node.left.is_some() && node.right.is_some() {
                    let successor = remove_min(&mut node.right);
                    let entry = mem::replace(&mut node.entry, successor);
                    *tree = Some(node);
                    Some(entry)
                } else {
                    let unboxed_node = *node;
                    let Node { entry, left, right, .. } = unboxed_node;
                    match (left, right) {
                        (None, right) => *tree = right,
                        (left, None) => *tree = left,
                        _ => unreachable!(),
                    }
                    Some(entry)
                }
            },
        },
        None => return None,
    };

    rebalance_after_removal(tree);
    ret
}

pub fn get<'a, T, U>(tree: &'a Tree<T, U>, key: &T) -> Option<&'a Entry<T, U>>
where
    T: Ord,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(&node.entry.key) {
            Ordering::Less => get(&node.left, key),
            Ordering::Greater => get(&node.right, key),
            Ordering::Equal => Some(&node.entry),
        }
    })
}

pub fn get_mut<'a, T, U>(tree: &'a mut Tree<T, U>, key: &T) -> Option<&'a mut Entry<T, U>>
where
    T: Ord,
{
    tree.as_mut().and_then(|node| {
        match key.cmp(&node.entry.key) {
            Ordering::Less => get_mut(&mut node.left, key),
            Ordering::Greater => get_mut(&mut node.right, key),
            Ordering::Equal => Some(&mut node.entry),
        }
    })
}

pub fn range<'a, T, U>(tree: &'a Tree<T, U>, min: &T, max: &T, result: &mut Vec<(&'a T, &'a U)>)
where
    T: Ord,
{
    if let Some(ref node) = tree {
        if *min < node.entry.key {
            range(&node.left, min, max, result);
        }
        if *min <= node.entry.key && node.entry.key <= *max {
            result.push((&node.entry.key, &node.entry.value));
        }
        if *max > node.entry.key {
            range(&node.right, min, max, result);
        }
    }
}

pub fn depth_of<T, U>(tree: &Tree<T, U>, key: &T) -> Option<usize>
where
    T: Ord,
{
    let mut curr = tree;
    let mut depth = 0;
    while let Some(ref node) = curr {
        match key.cmp(&node.entry.key) {
            Ordering::Less => curr = &node.left,
            Ordering::Greater => curr = &node.right,
            Ordering::Equal => return Some(depth),
        }
        depth += 1;
    }
    None
}

pub fn min<T, U>(tree: &Tree<T, U>) -> Option<&Entry<T, U>>
where
    T: Ord,
{
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        &curr.entry
    })
}

pub fn max<T, U>(tree: &Tree<T, U>) -> Option<&Entry<T, U>>
where
    T: Ord,
{
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        &curr.entry
    })
}

#[cfg(test)]
pub fn assert_invariants<T, U>(tree: &Tree<T, U>) -> usize
where
    T: Ord,
{
    use std::cmp;

    match tree {
        None => 0,
        Some(ref node) => {
            let left_height = assert_invariants(&node.left);
            let right_height = assert_invariants(&node.right);
            if let Some(ref left_node) = node.left {
                assert!(left_node.entry.key < node.entry.key);
            }
            if let Some(ref right_node) = node.right {
                assert!(node.entry.key < right_node.entry.key);
            }
            assert_eq!(node.height, cmp::max(left_height, right_height) + 1);
            assert!((left_height as i32 - right_height as i32).abs() <= 1);
            node.height
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(keys: &[i32]) -> Tree<i32, ()> {
        let mut tree = None;
        for &key in keys {
            insert(&mut tree, Node::new(key, ())).unwrap();
        }
        tree
    }

    fn root_key(tree: &Tree<i32, ()>) -> i32 {
        tree.as_ref().unwrap().entry.key
    }

    #[test]
    fn test_insert_single_left_rotation() {
        let tree = build(&[10, 20, 30]);

        let root = tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 20);
        assert_eq!(root_key(&root.left), 10);
        assert_eq!(root_key(&root.right), 30);
        assert_invariants(&tree);
    }

    #[test]
    fn test_insert_single_right_rotation() {
        let tree = build(&[30, 20, 10]);

        let root = tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 20);
        assert_eq!(root_key(&root.left), 10);
        assert_eq!(root_key(&root.right), 30);
        assert_invariants(&tree);
    }

    #[test]
    fn test_insert_double_rotation_left_right() {
        let tree = build(&[30, 10, 20]);

        let root = tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 20);
        assert_eq!(root_key(&root.left), 10);
        assert_eq!(root_key(&root.right), 30);
        assert_invariants(&tree);
    }

    #[test]
    fn test_insert_double_rotation_right_left() {
        let tree = build(&[10, 30, 20]);

        let root = tree.as_ref().unwrap();
        assert_eq!(root.entry.key, 20);
        assert_eq!(root_key(&root.left), 10);
        assert_eq!(root_key(&root.right), 30);
        assert_invariants(&tree);
    }

    #[test]
    fn test_insert_duplicate_key() {
        let mut tree = build(&[10, 20, 30]);

        let err = insert(&mut tree, Node::new(20, ())).unwrap_err();
        assert_eq!(err, Error::DuplicateKey);
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_leaf() {
        let mut tree = build(&[20, 10, 30]);

        let entry = remove(&mut tree, &10).unwrap();
        assert_eq!(entry.key, 10);
        assert_eq!(depth_of(&tree, &10), None);
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_single_child() {
        let mut tree = build(&[20, 10, 30, 25]);

        let entry = remove(&mut tree, &30).unwrap();
        assert_eq!(entry.key, 30);
        assert_eq!(root_key(&tree.as_ref().unwrap().right), 25);
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_two_children_copies_successor() {
        let mut tree = build(&[2, 1, 4, 3, 5]);

        let entry = remove(&mut tree, &2).unwrap();
        assert_eq!(entry.key, 2);
        assert_eq!(root_key(&tree), 3);
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut tree = build(&[20, 10, 30]);

        assert!(remove(&mut tree, &40).is_none());
        assert_eq!(root_key(&tree), 20);
        assert_invariants(&tree);
    }

    #[test]
    fn test_remove_rebalances_every_ancestor() {
        // A minimal tree of height 5; deleting the shallowest leaf cascades rotations
        // all the way up to the root.
        let mut tree = build(&[8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1]);

        assert!(remove(&mut tree, &12).is_some());
        assert_invariants(&tree);
    }

    #[test]
    fn test_height_convention() {
        let mut tree: Tree<i32, ()> = None;
        assert_eq!(height(&tree), 0);

        insert(&mut tree, Node::new(1, ())).unwrap();
        assert_eq!(height(&tree), 1);

        insert(&mut tree, Node::new(2, ())).unwrap();
        assert_eq!(height(&tree), 2);
    }
}
