//! Protocol buffer messages of the on-disk transcript database.
//!
//! The messages are declared with the `prost` derive macros directly.  All map fields use
//! `BTreeMap` so that encoding the same message twice yields identical bytes.

pub mod txs {
    use std::collections::BTreeMap;

    /// Strand of a genomic interval.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Strand {
        Forward = 0,
        Reverse = 1,
    }

    /// Contig name/id/length index.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ReferenceDictionary {
        #[prost(btree_map = "string, int32", tag = "1")]
        pub contig_name_to_id: BTreeMap<String, i32>,
        #[prost(btree_map = "int32, string", tag = "2")]
        pub contig_id_to_name: BTreeMap<i32, String>,
        #[prost(btree_map = "int32, int32", tag = "3")]
        pub contig_id_to_length: BTreeMap<i32, i32>,
    }

    /// Half-open genomic interval.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct GenomeInterval {
        #[prost(int32, tag = "1")]
        pub contig_id: i32,
        #[prost(enumeration = "Strand", tag = "2")]
        pub strand: i32,
        #[prost(int32, tag = "3")]
        pub begin_pos: i32,
        #[prost(int32, tag = "4")]
        pub end_pos: i32,
    }

    /// Alignment anchor.
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct AlignmentAnchor {
        #[prost(int32, tag = "1")]
        pub gap_pos: i32,
        #[prost(int32, tag = "2")]
        pub seq_pos: i32,
    }

    /// Alignment of transcript to genome.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Alignment {
        #[prost(message, repeated, tag = "1")]
        pub ref_anchors: Vec<AlignmentAnchor>,
        #[prost(message, repeated, tag = "2")]
        pub qry_anchors: Vec<AlignmentAnchor>,
    }

    /// One transcript.
    ///
    /// Files written before `alignment` was added to the schema do not carry tag 13.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TranscriptModel {
        #[prost(string, tag = "1")]
        pub accession: String,
        #[prost(string, tag = "2")]
        pub gene_symbol: String,
        #[prost(message, optional, tag = "3")]
        pub tx_region: Option<GenomeInterval>,
        #[prost(message, optional, tag = "4")]
        pub cds_region: Option<GenomeInterval>,
        #[prost(message, repeated, tag = "5")]
        pub exon_regions: Vec<GenomeInterval>,
        #[prost(string, tag = "6")]
        pub sequence: String,
        #[prost(string, tag = "7")]
        pub gene_id: String,
        #[prost(int32, tag = "8")]
        pub transcript_support_level: i32,
        #[prost(btree_map = "string, string", tag = "9")]
        pub alt_gene_ids: BTreeMap<String, String>,
        #[prost(bool, tag = "10")]
        pub has_substitutions: bool,
        #[prost(bool, tag = "11")]
        pub has_indels: bool,
        #[prost(message, optional, tag = "13")]
        pub alignment: Option<Alignment>,
    }

    /// The whole database: dictionary plus transcripts.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TranscriptDatabase {
        #[prost(message, optional, tag = "1")]
        pub reference_dictionary: Option<ReferenceDictionary>,
        #[prost(message, repeated, tag = "2")]
        pub transcript_models: Vec<TranscriptModel>,
    }
}
