//! Streaming reader for `hdfs oiv -p XML` dumps.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use fsheat_core::{HeatError, Result};

use crate::document::{BlockEntry, DirectoryEntry, InodeEntry, SnapshotDocument};

/// Elements the reader cares about. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    InodeSection,
    Inode,
    Id,
    Type,
    Name,
    Mtime,
    Atime,
    Symlink,
    Blocks,
    Block,
    NumBytes,
    DirectorySection,
    Directory,
    Parent,
    Child,
    Other,
}

impl Tag {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"INodeSection" => Tag::InodeSection,
            b"inode" => Tag::Inode,
            b"id" => Tag::Id,
            b"type" => Tag::Type,
            b"name" => Tag::Name,
            b"mtime" => Tag::Mtime,
            b"atime" => Tag::Atime,
            b"symlink" => Tag::Symlink,
            b"blocks" => Tag::Blocks,
            b"block" => Tag::Block,
            b"numBytes" => Tag::NumBytes,
            b"INodeDirectorySection" => Tag::DirectorySection,
            b"directory" => Tag::Directory,
            b"parent" => Tag::Parent,
            b"child" => Tag::Child,
            _ => Tag::Other,
        }
    }
}

/// Event-driven builder of a [`SnapshotDocument`].
#[derive(Default)]
struct DocumentBuilder {
    stack: Vec<Tag>,
    text: String,
    inode: Option<InodeEntry>,
    directory: Option<DirectoryEntry>,
    document: SnapshotDocument,
}

impl DocumentBuilder {
    fn open(&mut self, tag: Tag) {
        self.stack.push(tag);
        self.text.clear();

        match self.stack.as_slice() {
            [.., Tag::InodeSection, Tag::Inode] => self.inode = Some(InodeEntry::default()),
            [.., Tag::InodeSection, Tag::Inode, Tag::Blocks, Tag::Block] => {
                if let Some(inode) = self.inode.as_mut() {
                    inode.blocks.push(BlockEntry::default());
                }
            }
            [.., Tag::DirectorySection, Tag::Directory] => {
                self.directory = Some(DirectoryEntry::default())
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        let text = std::mem::take(&mut self.text);

        match self.stack.as_slice() {
            [.., Tag::InodeSection, Tag::Inode, field] => {
                if let Some(inode) = self.inode.as_mut() {
                    match field {
                        Tag::Id => inode.id = Some(text),
                        Tag::Type => inode.kind = Some(text),
                        Tag::Name => inode.name = Some(text),
                        Tag::Mtime => inode.mtime = Some(text),
                        Tag::Atime => inode.atime = Some(text),
                        Tag::Symlink => inode.symlink = Some(text),
                        _ => {}
                    }
                }
            }
            [.., Tag::Inode, Tag::Blocks, Tag::Block, Tag::NumBytes] => {
                if let Some(block) = self.inode.as_mut().and_then(|i| i.blocks.last_mut()) {
                    block.num_bytes = Some(text);
                }
            }
            [.., Tag::InodeSection, Tag::Inode] => {
                if let Some(inode) = self.inode.take() {
                    self.document.inodes.push(inode);
                }
            }
            [.., Tag::DirectorySection, Tag::Directory, Tag::Parent] => {
                if let Some(directory) = self.directory.as_mut() {
                    directory.parent = Some(text);
                }
            }
            [.., Tag::DirectorySection, Tag::Directory, Tag::Child] => {
                if let Some(directory) = self.directory.as_mut() {
                    directory.children.push(text);
                }
            }
            [.., Tag::DirectorySection, Tag::Directory] => {
                if let Some(directory) = self.directory.take() {
                    self.document.directories.push(directory);
                }
            }
            _ => {}
        }

        self.stack.pop();
    }
}

/// Parse an XML dump from any buffered reader.
///
/// Sections other than the inode and directory sections are skipped.
/// A syntax error aborts the whole parse.
pub fn read_xml<R: BufRead>(source: R) -> Result<SnapshotDocument> {
    let mut reader = Reader::from_reader(source);
    let mut builder = DocumentBuilder::default();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            HeatError::malformed(format!(
                "XML error at byte {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => builder.open(Tag::from_name(e.local_name().as_ref())),
            Event::Empty(e) => {
                builder.open(Tag::from_name(e.local_name().as_ref()));
                builder.close();
            }
            Event::End(_) => builder.close(),
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| {
                    HeatError::malformed(format!(
                        "bad text near byte {}: {e}",
                        reader.buffer_position()
                    ))
                })?;
                builder.text.push_str(&text);
            }
            Event::CData(c) => builder.text.push_str(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !builder.stack.is_empty() {
        return Err(HeatError::malformed("unexpected end of XML document"));
    }

    Ok(builder.document)
}

/// Parse an XML dump held in memory.
pub fn read_xml_str(xml: &str) -> Result<SnapshotDocument> {
    read_xml(xml.as_bytes())
}

/// Parse an XML dump from a file.
pub fn read_xml_file(path: impl AsRef<Path>) -> Result<SnapshotDocument> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| HeatError::io(path, e))?;
    read_xml(BufReader::new(file))
}
