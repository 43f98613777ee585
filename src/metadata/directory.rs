//! Directory tree of parsed metadata fields
//!
//! kamadak-exif returns a flat list of fields, each tagged with the context
//! it was read in and the number of the root directory it hangs under.
//! This module regroups them into an arena ([`DirectoryTree`]) with
//! index-based child links, so fields can be visited directory by
//! directory with their full paths.

use exif::{Context, Field};
use std::collections::HashMap;

/// Path of the root directory chain (IFD0, IFD1, ...)
pub const ROOT_PATH: &str = "IFD";
/// Path of the Exif sub-directory
pub const EXIF_PATH: &str = "IFD/Exif";
/// Path of the GPS sub-directory
pub const GPS_PATH: &str = "IFD/GPSInfo";
/// Path of the interoperability sub-directory
pub const INTEROP_PATH: &str = "IFD/Exif/Iop";

/// One directory occurrence in the arena
#[derive(Debug, Clone)]
pub struct Directory<'a> {
    /// Path without occurrence indices, e.g. `IFD/Exif`
    pub path: &'static str,
    /// Path with occurrence indices, e.g. `IFD1` or `IFD/Exif`
    pub fq_path: String,
    /// Occurrence index among directories sharing `path` under one parent
    pub index: usize,
    pub fields: Vec<&'a Field>,
    pub children: Vec<usize>,
}

/// Where a context sits in the tree
struct Placement {
    parent: Option<Context>,
    path: &'static str,
    segment: &'static str,
}

fn placement(context: Context) -> Option<Placement> {
    let (parent, path, segment) = match context {
        Context::Tiff => (None, ROOT_PATH, ROOT_PATH),
        Context::Exif => (Some(Context::Tiff), EXIF_PATH, "Exif"),
        Context::Gps => (Some(Context::Tiff), GPS_PATH, "GPSInfo"),
        Context::Interop => (Some(Context::Exif), INTEROP_PATH, "Iop"),
        _ => return None,
    };
    Some(Placement { parent, path, segment })
}

fn indexed(segment: &str, index: usize) -> String {
    if index == 0 {
        segment.to_string()
    } else {
        format!("{segment}{index}")
    }
}

/// Arena of directories
#[derive(Debug, Default)]
pub struct DirectoryTree<'a> {
    nodes: Vec<Directory<'a>>,
    roots: Vec<usize>,
    by_context: HashMap<(Context, u16), usize>,
}

impl<'a> DirectoryTree<'a> {
    /// Group fields by the directory they were read from
    ///
    /// Fields of a context with no known place in the tree are dropped.
    pub fn build(fields: impl IntoIterator<Item = &'a Field>) -> Self {
        let mut tree = DirectoryTree::default();
        for field in fields {
            if let Some(id) = tree.node(field.tag.context(), field.ifd_num.index()) {
                tree.nodes[id].fields.push(field);
            }
        }
        tree.roots.sort_by_key(|&id| tree.nodes[id].index);
        tree
    }

    /// The node for a context under root directory `ifd_num`, created
    /// along with its ancestors on first use
    fn node(&mut self, context: Context, ifd_num: u16) -> Option<usize> {
        if let Some(&id) = self.by_context.get(&(context, ifd_num)) {
            return Some(id);
        }
        let place = placement(context)?;

        let (parent, index, fq_path) = match place.parent {
            None => {
                let index = ifd_num as usize;
                (None, index, indexed(ROOT_PATH, index))
            }
            Some(parent_context) => {
                let parent = self.node(parent_context, ifd_num)?;
                let index = self.nodes[parent]
                    .children
                    .iter()
                    .filter(|&&c| self.nodes[c].path == place.path)
                    .count();
                let fq_path = format!(
                    "{}/{}",
                    self.nodes[parent].fq_path,
                    indexed(place.segment, index)
                );
                (Some(parent), index, fq_path)
            }
        };

        self.nodes.push(Directory {
            path: place.path,
            fq_path,
            index,
            fields: Vec::new(),
            children: Vec::new(),
        });
        let id = self.nodes.len() - 1;
        match parent {
            Some(parent) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        self.by_context.insert((context, ifd_num), id);
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Directories in pre-order: each directory, then its sub-directories,
    /// then the next directory of the root chain
    pub fn iter(&self) -> impl Iterator<Item = &Directory<'a>> + '_ {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order.into_iter().map(move |id| &self.nodes[id])
    }
}
