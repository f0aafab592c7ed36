//! Common I/O code using sync I/O.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use flate2::bufread::MultiGzDecoder;

/// Returns whether the path looks like a gzip or bgzip file.
pub fn is_gz<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    [Some(Some("gz")), Some(Some("bgz"))].contains(&path.as_ref().extension().map(|s| s.to_str()))
}

/// Transparently open a file with gzip decoder.
///
/// Note that decoding of multi-member gzip files is automatically supported, as is needed for
/// `bgzip` files.
///
/// # Arguments
///
/// * `path` - A path to the file to open.
pub fn open_read_maybe_gz<P>(path: P) -> Result<Box<dyn BufRead>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if is_gz(path.as_ref()) {
        tracing::trace!("Opening {:?} as gzip for reading", path.as_ref());
        let file = File::open(path)?;
        let bufreader = BufReader::new(file);
        let decoder = MultiGzDecoder::new(bufreader);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        tracing::trace!("Opening {:?} as plain text for reading", path.as_ref());
        let file = File::open(path).map(BufReader::new)?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use flate2::{write::GzEncoder, Compression};

    #[rstest::rstest]
    #[case("catalogue.json", false)]
    #[case("catalogue.json.gz", true)]
    #[case("catalogue.json.bgz", true)]
    fn is_gz(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(super::is_gz(path), expected);
    }

    #[rstest::rstest]
    #[case("lines.txt")]
    #[case("lines.txt.gz")]
    fn open_read_maybe_gz(#[case] filename: &str) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join(filename);
        let contents = (1..100).map(|i| format!("{}\n", i)).collect::<String>();

        {
            let file = std::fs::File::create(&path)?;
            if super::is_gz(&path) {
                let mut encoder = GzEncoder::new(file, Compression::default());
                encoder.write_all(contents.as_bytes())?;
                encoder.finish()?;
            } else {
                let mut file = file;
                file.write_all(contents.as_bytes())?;
            }
        }

        let mut reader = super::open_read_maybe_gz(&path)?;
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;

        assert_eq!(buf, contents);

        Ok(())
    }
}
