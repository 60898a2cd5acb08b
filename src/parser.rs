//! XML parsing for LS3 scene files
//!
//! The parser streams over the document with `quick-xml` and collects the
//! handful of elements that matter for triangle counting: subsets with
//! their faces, links to other scene files, and animation markers. All
//! other content is skipped without validation.
//!
//! Element and attribute names are matched on their local name and accept
//! both the LS3 spelling (`SubSet`, `MeshI`, `Dateiname`, ...) and a
//! descriptive alias (`subset`, `meshIndexCount`, `filename`, ...).

use crate::error::{Error, Result};
use crate::model::Subset;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeSet, HashMap};

/// Default buffer capacity for XML parsing (4KB)
const XML_BUFFER_CAPACITY: usize = 4096;

/// Mesh indices per triangle
const INDICES_PER_TRIANGLE: u64 = 3;

/// Value of the info-only attribute that excludes a link from traversal
const INFO_ONLY_VALUE: &str = "1";

mod names {
    pub const SUBSET: &[&str] = &["SubSet", "subset"];
    pub const MESH_INDEX_COUNT: &[&str] = &["MeshI", "meshIndexCount"];
    pub const FACE: &[&str] = &["Face", "face"];
    pub const NAME: &[&str] = &["Name", "name"];
    pub const LINK_CONTAINER: &[&str] = &["Verknuepfte", "references"];
    pub const LINK: &[&str] = &["Datei", "file"];
    pub const FILENAME: &[&str] = &["Dateiname", "filename"];
    pub const INFO_ONLY: &[&str] = &["NurInfo", "infoOnly"];
    pub const MESH_ANIMATION: &[&str] = &["MeshAnimation", "meshAnimation"];
    pub const LINK_ANIMATION: &[&str] = &["VerknAnimation", "referenceAnimation"];
    pub const ANIMATION_INDEX: &[&str] = &["AniIndex", "animationIndex"];
}

/// A raw reference to another file, as written in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Ordinal among all link elements of the document, before filtering
    pub link_index: usize,
    /// Reference string, not yet resolved
    pub reference: String,
    /// Kept for metadata only, never traversed
    pub info_only: bool,
    /// Whether a reference animation targets this link
    pub animated: bool,
}

/// Everything the counter needs from one scene document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScene {
    /// Selected subsets in document order
    ///
    /// A subset is selected when it has a positive index count or at least
    /// one face.
    pub subsets: Vec<Subset>,
    /// Links with a non-empty file name, in document order
    pub links: Vec<LinkRef>,
    /// Subset ordinals targeted by mesh animations, counted over every
    /// subset element including unselected ones
    pub mesh_animations: BTreeSet<usize>,
    /// Link indices targeted by reference animations
    pub link_animations: BTreeSet<usize>,
}

impl ParsedScene {
    /// Sum of the triangle counts of all subsets
    pub fn own_triangle_count(&self) -> u64 {
        self.subsets
            .iter()
            .fold(0u64, |sum, s| sum.saturating_add(s.triangle_count))
    }

    /// Links that take part in traversal
    pub fn traversable_links(&self) -> impl Iterator<Item = &LinkRef> {
        self.links.iter().filter(|link| !link.info_only)
    }
}

/// Subset being accumulated while its element is open
struct OpenSubset {
    depth: usize,
    ordinal: usize,
    index_count: u64,
    faces: u64,
    name: Option<String>,
}

impl OpenSubset {
    fn is_selected(&self) -> bool {
        self.index_count > 0 || self.faces > 0
    }

    fn finish(self) -> Subset {
        Subset {
            triangle_count: (self.index_count / INDICES_PER_TRIANGLE).saturating_add(self.faces),
            name: self.name,
            animated: false,
        }
    }
}

/// Parse the XML text of one scene file
///
/// # Example
///
/// ```
/// use tricount::parser::parse_scene_xml;
///
/// let scene = parse_scene_xml(r#"
///     <Zusi><Landschaft>
///         <SubSet MeshI="9"><Face i="0;1;2"/><Face i="2;1;3"/></SubSet>
///     </Landschaft></Zusi>"#).unwrap();
/// assert_eq!(scene.own_triangle_count(), 5);
/// ```
pub fn parse_scene_xml(xml: &str) -> Result<ParsedScene> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut scene = ParsedScene::default();
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);
    let mut stack: Vec<String> = Vec::new();
    let mut open_subsets: Vec<OpenSubset> = Vec::new();
    let mut selected: Vec<(usize, Subset)> = Vec::new();
    let mut next_subset_ordinal = 0usize;
    let mut next_link_index = 0usize;

    let mut close = |subset: OpenSubset| {
        if subset.is_selected() {
            selected.push((subset.ordinal, subset.finish()));
        }
    };

    loop {
        buf.clear();
        let (element, is_empty) = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::End(_) => {
                stack.pop();
                if open_subsets
                    .last()
                    .is_some_and(|subset| subset.depth == stack.len())
                {
                    if let Some(subset) = open_subsets.pop() {
                        close(subset);
                    }
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        let name = element_name(&element)?;

        if is(&name, names::SUBSET) {
            let subset = parse_subset_start(&element, stack.len(), next_subset_ordinal)?;
            next_subset_ordinal += 1;
            if is_empty {
                close(subset);
            } else {
                open_subsets.push(subset);
            }
        } else if is(&name, names::FACE) {
            if let Some(subset) = open_subsets.last_mut() {
                subset.faces += 1;
            }
        } else if is(&name, names::LINK)
            && stack
                .last()
                .is_some_and(|parent| is(parent, names::LINK_CONTAINER))
        {
            let link_index = next_link_index;
            next_link_index += 1;
            if let Some(link) = parse_link(&element, link_index)? {
                scene.links.push(link);
            }
        } else if is(&name, names::MESH_ANIMATION) {
            scene.mesh_animations.insert(parse_animation_index(&element)?);
        } else if is(&name, names::LINK_ANIMATION) {
            scene.link_animations.insert(parse_animation_index(&element)?);
        }

        if !is_empty {
            stack.push(name);
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(Error::InvalidXml(format!(
            "Unexpected end of document inside element '<{}>'",
            unclosed
        )));
    }

    // Nested subsets close before their parent.
    selected.sort_by_key(|(ordinal, _)| *ordinal);
    scene.subsets = selected
        .into_iter()
        .map(|(ordinal, mut subset)| {
            subset.animated = scene.mesh_animations.contains(&ordinal);
            subset
        })
        .collect();
    for link in &mut scene.links {
        link.animated = scene.link_animations.contains(&link.link_index);
    }

    Ok(scene)
}

/// Start a subset; a negative index count deselects it unless it has faces
fn parse_subset_start(e: &BytesStart, depth: usize, ordinal: usize) -> Result<OpenSubset> {
    let attrs = parse_attributes(e)?;

    let index_count = match attr(&attrs, names::MESH_INDEX_COUNT) {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map(|count| u64::try_from(count).unwrap_or(0))
            .map_err(|_| Error::parse_error_with_context("SubSet MeshI", value, "integer"))?,
        None => 0,
    };

    Ok(OpenSubset {
        depth,
        ordinal,
        index_count,
        faces: 0,
        name: attr(&attrs, names::NAME)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
    })
}

/// Parse a link element, returning `None` when it has no file name
fn parse_link(e: &BytesStart, link_index: usize) -> Result<Option<LinkRef>> {
    let attrs = parse_attributes(e)?;

    let reference = match attr(&attrs, names::FILENAME).map(str::trim) {
        Some(reference) if !reference.is_empty() => reference.to_string(),
        _ => return Ok(None),
    };

    let info_only = attr(&attrs, names::INFO_ONLY).is_some_and(|v| v.trim() == INFO_ONLY_VALUE);

    Ok(Some(LinkRef {
        link_index,
        reference,
        info_only,
        animated: false,
    }))
}

/// Animation index of a marker element, defaulting to 0
fn parse_animation_index(e: &BytesStart) -> Result<usize> {
    let attrs = parse_attributes(e)?;
    match attr(&attrs, names::ANIMATION_INDEX) {
        Some(value) => value.trim().parse::<usize>().map_err(|_| {
            Error::parse_error_with_context("AniIndex", value, "non-negative integer")
        }),
        None => Ok(0),
    }
}

fn element_name(e: &BytesStart) -> Result<String> {
    let name = e.name();
    let name_str =
        std::str::from_utf8(name.as_ref()).map_err(|e| Error::InvalidXml(e.to_string()))?;
    Ok(get_local_name(name_str).to_string())
}

/// Extract local name from potentially namespaced XML name
///
/// - `"ls3:SubSet"` returns `"SubSet"`
/// - `"SubSet"` returns `"SubSet"`
pub(crate) fn get_local_name(name_str: &str) -> &str {
    match name_str.rfind(':') {
        Some(pos) => &name_str[pos + 1..],
        None => name_str,
    }
}

/// Collect the attributes of an element keyed by local name
fn parse_attributes(e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::with_capacity(8);

    for attr in e.attributes() {
        let attr = attr?;
        let key =
            std::str::from_utf8(attr.key.as_ref()).map_err(|e| Error::InvalidXml(e.to_string()))?;
        let value =
            std::str::from_utf8(&attr.value).map_err(|e| Error::InvalidXml(e.to_string()))?;

        attrs.insert(get_local_name(key).to_string(), value.to_string());
    }

    Ok(attrs)
}

fn attr<'a>(attrs: &'a HashMap<String, String>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|alias| attrs.get(*alias))
        .map(String::as_str)
}

fn is(name: &str, aliases: &[&str]) -> bool {
    aliases.contains(&name)
}
