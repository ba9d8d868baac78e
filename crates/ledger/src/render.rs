//! Secondary (RDF/XML) rendering of metadata records.
//!
//! Converts a [`MetadataRecord`] into the `metadata.xml` file that
//! accompanies every record, using an [upon] template. The triple shapes
//! mirror the institutional profile: Dublin Core terms for the identifier,
//! description and collection membership, METS for the object/alternate
//! record identifiers and custodian roles, FOAF for the responsible
//! department (a group) and person.
//!
//! Rendering is deliberately second-class: a failure here is reported and
//! counted, but never invalidates the record it was rendered from.

use crate::error::{ErrorKind, Result};
use crate::record::MetadataRecord;
use arca_object::names;
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use upon::{Engine, Template};

const TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rdf:RDF
    xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
    xmlns:dc="http://dublincore.org/2012/06/14/dcelements.rdf#"
    xmlns:dcterms="http://purl.org/dc/terms#"
    xmlns:dcmitype="http://purl.org/dc/dcmitype#"
    xmlns:foaf="http://xmlns.com/foaf/spec/index.rdf#"
    xmlns:owl="http://www.w3.org/2002/07/owl#"
    xmlns:premis="http://www.loc.gov/premis/rdf/v3#"
    xmlns:mets="http://www.loc.gov/standards/mets/mets.xsd#">
  <rdf:Description rdf:about="{{ object_uri }}">
    <dcterms:identifier>{{ system_id }}</dcterms:identifier>
    <mets:OBJID>{{ system_id }}</mets:OBJID>
    <mets:altRecordID>{{ local_id }}</mets:altRecordID>
    <dc:contributor rdf:nodeID="department"/>
    <dc:contributor rdf:nodeID="person"/>
    <dcterms:isPartOf rdf:resource="{{ collection_uri }}"/>
    <dcterms:description>{{ description }}</dcterms:description>
  </rdf:Description>
  <rdf:Description rdf:nodeID="department">
    <rdf:type rdf:resource="http://xmlns.com/foaf/spec/index.rdf#Group"/>
    <mets:ROLE rdf:resource="http://www.loc.gov/standards/mets/mets.xsd#CUSTODIAN"/>
    <foaf:name>{{ department }}</foaf:name>
  </rdf:Description>
  <rdf:Description rdf:nodeID="person">
    <rdf:type rdf:resource="http://xmlns.com/foaf/spec/index.rdf#Person"/>
    <mets:ROLE rdf:resource="http://www.loc.gov/standards/mets/mets.xsd#CUSTODIAN"/>
    <foaf:mbox>{{ person }}</foaf:mbox>
  </rdf:Description>
  <rdf:Description rdf:about="{{ collection_uri }}">
    <foaf:name>{{ collection }}</foaf:name>
  </rdf:Description>
</rdf:RDF>
"#;

/// Renders [`MetadataRecord`]s into their RDF/XML form.
///
/// The template is compiled eagerly so syntax problems surface at
/// construction, not in the middle of a batch.
pub struct Renderer {
    engine: Engine<'static>,
    template: Template<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let engine = Engine::new();
        let template = engine.compile(TEMPLATE.to_string()).or_raise(|| ErrorKind::Render)?;
        Ok(Self { engine, template })
    }

    /// Render the record to an RDF/XML string.
    pub fn render(&self, record: &MetadataRecord) -> Result<String> {
        self.template
            .render(&self.engine, upon::value! {
                system_id: escape(&record.system_id),
                local_id: escape(&record.local_id),
                department: escape(&record.department),
                person: escape(&record.person),
                collection: escape(&record.collection),
                description: escape(&record.description),
                object_uri: escape(&record.object_uri),
                collection_uri: escape(&record.collection_uri),
            })
            .to_string()
            .or_raise(|| ErrorKind::Render)
    }

    /// Render and write `metadata.xml` into an object directory,
    /// overwriting any stale rendering.
    pub fn render_to(&self, record: &MetadataRecord, object_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = object_dir.as_ref().join(names::RENDERING);
        fs::write(&path, self.render(record)?).map_err(ErrorKind::Io)?;
        Ok(path)
    }
}

/// Minimal XML text/attribute escaping. Values are escaped before they
/// enter the template context, so the template itself stays plain.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
