//! Tag metadata lookup for reports

use crate::model::{AudioBuffer, SourceInfo};
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;

/// Describe a loaded source, filling title/artist from tags when present
///
/// Tag problems are never fatal: the audio already decoded, so the
/// report simply goes without them.
pub fn read_source_info(path: &Path, buffer: &AudioBuffer) -> SourceInfo {
    let mut info = SourceInfo::new(path, buffer.duration_secs(), buffer.sample_rate());

    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("No readable tags in {:?}: {}", path, e);
            return info;
        }
    };

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        info.title = tag.title().map(|t| t.into_owned());
        info.artist = tag.artist().map(|a| a.into_owned());
    }

    info
}
