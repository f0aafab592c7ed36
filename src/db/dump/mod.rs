//! Dump transcript database.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use crate::db::load::load_tx_db;

/// Command line arguments for `db dump` sub command.
#[derive(Parser, Debug)]
#[command(about = "Dump transcript database", long_about = None)]
pub struct Args {
    /// Path to database file to dump, current or legacy format.
    #[arg(long)]
    pub path_db: PathBuf,
}

/// Dump the database as YAML to `writer`.
pub fn run_with_write<W: Write>(
    _common: &crate::common::Args,
    args: &Args,
    writer: &mut W,
) -> Result<(), anyhow::Error> {
    tracing::info!("Opening transcript database");
    let tx_db = load_tx_db(&args.path_db)?;
    tracing::info!("Dumping ...");
    serde_yaml::to_writer(writer, &tx_db)?;
    tracing::info!("... done");

    Ok(())
}

/// Main entry point for `db dump` sub command.
pub fn run(common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    run_with_write(common, args, &mut lock)?;
    lock.flush()?;

    Ok(())
}

#[cfg(test)]
mod test {
    use temp_testdir::TempDir;

    use super::{run_with_write, Args};
    use crate::db::legacy::LegacyStore;
    use crate::db::store::ProtobufStore;
    use crate::model::database::test::{reference, transcript};
    use crate::model::TranscriptAnnotationDatabase;

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn dump(#[case] legacy: bool) -> Result<(), anyhow::Error> {
        let tmp_dir = TempDir::default();
        let path_db = tmp_dir.join("txs.bin");
        let reference = reference();
        let db = TranscriptAnnotationDatabase::new(
            reference.clone(),
            vec![transcript(&reference, "NM_000141.4", "FGFR2", Some("2263"), &[])],
        )?;
        if legacy {
            LegacyStore.save(&path_db, &db)?;
        } else {
            ProtobufStore::default().save(&path_db, &db)?;
        }

        let mut buf: Vec<u8> = Vec::new();
        run_with_write(&Default::default(), &Args { path_db }, &mut buf)?;
        let yaml = String::from_utf8(buf)?;

        assert!(yaml.contains("accession: NM_000141.4"));
        assert!(yaml.contains("gene_symbol: FGFR2"));
        assert!(yaml.contains("2263"));
        let back: TranscriptAnnotationDatabase = serde_yaml::from_str(&yaml)?;
        pretty_assertions::assert_eq!(back, db);

        Ok(())
    }

    #[test]
    fn dump_missing_file() {
        let tmp_dir = TempDir::default();

        let mut buf: Vec<u8> = Vec::new();
        let res = run_with_write(
            &Default::default(),
            &Args {
                path_db: tmp_dir.join("missing.bin"),
            },
            &mut buf,
        );

        assert!(res.is_err());
        assert!(buf.is_empty());
    }
}
