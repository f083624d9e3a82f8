use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;

use super::error::{FeedParseError, ItemError};
use super::model::{FeedItem, ParsedFeed};

const CHANNEL: &str = "channel";
const ITEM: &str = "item";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses raw feed bytes into typed items plus the channel title and description.
///
/// The document is read into a small element tree first, then the channel and
/// its items are located by name. RSS 2.0 (`<rss><channel>`), bare `<channel>`
/// documents and RSS 1.0 (items beside the channel under `<rdf:RDF>`) are all
/// accepted.
///
/// # Errors
/// Returns `FeedParseError::MalformedXml` if the bytes are not a well-formed
/// XML document. Problems with individual items never fail the whole feed:
/// those items are skipped and counted in `ParsedFeed::skipped_items`.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_feed(xml: &[u8]) -> Result<ParsedFeed, FeedParseError> {
    let root = read_document(xml)?;
    let feed = extract_feed(&root);

    tracing::debug!(
        items = feed.items.len(),
        skipped_items = feed.skipped_items,
        "Parsed feed"
    );

    Ok(feed)
}

/// Generic XML element with its content in document order
#[derive(Debug)]
struct Element {
    name: String,
    content: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(Vec<u8>),
}

impl Element {
    fn new(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            content: Vec::new(),
        }
    }

    fn children(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children().filter(move |child| child.name == name)
    }

    fn child<'a>(&'a self, name: &'a str) -> Option<&'a Element> {
        self.children_named(name).next()
    }

    fn push_text(&mut self, bytes: &[u8]) {
        if let Some(Node::Text(text)) = self.content.last_mut() {
            text.extend_from_slice(bytes);
        } else {
            self.content.push(Node::Text(bytes.to_vec()));
        }
    }

    /// All descendant text concatenated, markup dropped
    fn text(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut Vec<u8>) {
        for node in &self.content {
            match node {
                Node::Text(text) => out.extend_from_slice(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

fn read_document(xml: &[u8]) -> Result<Element, FeedParseError> {
    let xml = xml.strip_prefix(UTF8_BOM).unwrap_or(xml);
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if open.is_empty() && root.is_some() {
                    return Err(FeedParseError::malformed("multiple root elements"));
                }
                open.push(Element::new(e));
            }
            Ok(Event::Empty(ref e)) => attach(&mut open, &mut root, Element::new(e))?,
            Ok(Event::End(_)) => {
                let element = open
                    .pop()
                    .ok_or_else(|| FeedParseError::malformed("unexpected closing tag"))?;
                attach(&mut open, &mut root, element)?;
            }
            Ok(Event::Text(ref e)) => push_text(&mut open, e.as_ref())?,
            Ok(Event::CData(ref e)) => push_text(&mut open, e.as_ref())?,
            Ok(Event::GeneralRef(ref e)) => {
                let resolved = resolve_reference(e)?;
                push_text(&mut open, &resolved)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FeedParseError::malformed(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
            // Declarations, comments, processing instructions and doctypes carry no feed data
            _ => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(FeedParseError::malformed(format!(
            "unclosed element <{}>",
            unclosed.name
        )));
    }

    root.ok_or_else(|| FeedParseError::malformed("document has no root element"))
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), FeedParseError> {
    match open.last_mut() {
        Some(parent) => parent.content.push(Node::Element(element)),
        None if root.is_some() => {
            return Err(FeedParseError::malformed("multiple root elements"));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(open: &mut [Element], bytes: &[u8]) -> Result<(), FeedParseError> {
    match open.last_mut() {
        Some(element) => element.push_text(bytes),
        None if bytes.iter().all(u8::is_ascii_whitespace) => {}
        None => return Err(FeedParseError::malformed("text outside of the root element")),
    }
    Ok(())
}

/// Resolves `&#NN;`, `&#xNN;` and the five predefined entities. Anything else
/// (typically HTML entities such as `&nbsp;`) is kept literally.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<Vec<u8>, FeedParseError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(FeedParseError::malformed)?
    {
        let mut utf8 = [0u8; 4];
        return Ok(ch.encode_utf8(&mut utf8).as_bytes().to_vec());
    }

    let name = reference.decode().map_err(FeedParseError::malformed)?;
    Ok(match resolve_predefined_entity(&name) {
        Some(value) => value.as_bytes().to_vec(),
        None => format!("&{name};").into_bytes(),
    })
}

fn extract_feed(root: &Element) -> ParsedFeed {
    let channel = root.child(CHANNEL).unwrap_or(root);

    let mut item_nodes: Vec<&Element> = channel.children_named(ITEM).collect();
    if item_nodes.is_empty() && !std::ptr::eq(channel, root) {
        // RSS 1.0 keeps items next to the channel instead of inside it
        item_nodes = root.children_named(ITEM).collect();
    }

    let mut feed = ParsedFeed {
        title: channel_field(channel, "title"),
        description: channel_field(channel, "description"),
        ..ParsedFeed::default()
    };

    for (index, node) in item_nodes.into_iter().enumerate() {
        match extract_item(node) {
            Ok(item) => feed.items.push(item),
            Err(err) => {
                tracing::warn!(index, error = %err, "Skipping feed item");
                feed.skipped_items += 1;
            }
        }
    }

    feed
}

fn extract_item(node: &Element) -> Result<FeedItem, ItemError> {
    let pub_date = match field_text(node, "pubDate")? {
        Some(date) => Some(date),
        None => field_text(node, "dc:date")?,
    };

    Ok(FeedItem {
        title: field_text(node, "title")?,
        description: field_text(node, "description")?,
        link: field_text(node, "link")?,
        pub_date,
        guid: field_text(node, "guid")?,
    })
}

fn channel_field(channel: &Element, name: &'static str) -> Option<String> {
    match field_text(channel, name) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring channel {}", name);
            None
        }
    }
}

/// Text of the first child called `name`, trimmed. Blank text counts as absent.
fn field_text(node: &Element, name: &'static str) -> Result<Option<String>, ItemError> {
    let Some(field) = node.child(name) else {
        return Ok(None);
    };

    let text =
        String::from_utf8(field.text()).map_err(|_| ItemError::InvalidEncoding { field: name })?;
    let trimmed = text.trim();

    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
