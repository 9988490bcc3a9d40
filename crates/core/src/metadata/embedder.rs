//! Tag embedding with lofty.
//!
//! MP3 files get an ID3v2.4 tag (UTF-8 text frames, optional front cover).
//! WAV files get a RIFF INFO chunk: INAM, IART, IPRD and ICRD. RIFF INFO
//! has no picture support, so artwork is ignored for WAV.

use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::{FileType, TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

use crate::platform::AudioFormat;

use super::error::TagError;
use super::types::{TrackMetadata, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

/// Writes and reads [`TrackMetadata`] in audio containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagEmbedder;

impl TagEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<TaggedFile, lofty::error::LoftyError> {
        Probe::open(path)?
            .options(ParseOptions::new().parsing_mode(ParsingMode::BestAttempt))
            .read()
    }

    fn tag_type_for(format: AudioFormat) -> (TagType, FileType) {
        match format {
            AudioFormat::Mp3 => (TagType::Id3v2, FileType::Mpeg),
            AudioFormat::Wav => (TagType::RiffInfo, FileType::Wav),
        }
    }

    /// Embeds `metadata` into `audio`.
    ///
    /// `artwork` is attached as the front cover for MP3 when it can be read;
    /// an existing front cover is replaced.
    pub fn embed(
        &self,
        audio: &Path,
        format: AudioFormat,
        metadata: &TrackMetadata,
        artwork: Option<&Path>,
    ) -> Result<(), TagError> {
        let mut tagged_file = Self::open(audio).map_err(|e| TagError::embed_failed(audio, e))?;

        let (tag_type, file_type) = Self::tag_type_for(format);
        if tagged_file.file_type() != file_type {
            return Err(TagError::UnsupportedFormat {
                path: audio.to_path_buf(),
                found: format!("{:?}", tagged_file.file_type()),
            });
        }

        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file.tag_mut(tag_type).ok_or_else(|| {
            TagError::embed_failed(audio, format!("{:?} tags are not supported", tag_type))
        })?;

        tag.set_title(metadata.title.clone());
        tag.set_artist(metadata.artist.clone());
        tag.set_album(metadata.album.clone());
        if let Some(year) = metadata.year.as_deref().filter(|y| !y.is_empty()) {
            tag.insert_text(ItemKey::RecordingDate, year.to_string());
        }

        if format == AudioFormat::Mp3 {
            if let Some(artwork) = artwork {
                match std::fs::read(artwork) {
                    Ok(data) => {
                        tag.remove_picture_type(PictureType::CoverFront);
                        tag.push_picture(Picture::new_unchecked(
                            PictureType::CoverFront,
                            Some(MimeType::Jpeg),
                            Some("Cover".to_string()),
                            data,
                        ));
                    }
                    Err(e) => debug!("Skipping unreadable artwork {}: {}", artwork.display(), e),
                }
            }
        }

        tag.save_to_path(audio, WriteOptions::default())
            .map_err(|e| TagError::embed_failed(audio, e))?;

        debug!("Tagged {}", audio.display());
        Ok(())
    }

    /// Reads metadata back from `audio`, applying defaults for absent fields.
    ///
    /// WAV files are read from their RIFF INFO chunk; everything else from
    /// the primary tag.
    pub fn read(&self, audio: &Path) -> Result<TrackMetadata, TagError> {
        let tagged_file = Self::open(audio).map_err(|e| TagError::read_failed(audio, e))?;

        let tag = if tagged_file.file_type() == FileType::Wav {
            tagged_file
                .tag(TagType::RiffInfo)
                .or_else(|| tagged_file.primary_tag())
        } else {
            tagged_file.primary_tag()
        }
        .or_else(|| tagged_file.first_tag());

        let stem = audio
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(tag) = tag else {
            return Ok(TrackMetadata::with_title(stem));
        };

        let year = tag
            .get_string(&ItemKey::RecordingDate)
            .or_else(|| tag.get_string(&ItemKey::Year))
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .map(str::to_string);

        Ok(TrackMetadata {
            title: non_empty(tag.title()).unwrap_or(stem),
            artist: non_empty(tag.artist()).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            album: non_empty(tag.album()).unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            year,
            artwork_url: None,
        })
    }

    /// Whether `audio` carries a front cover picture.
    pub fn has_front_cover(&self, audio: &Path) -> Result<bool, TagError> {
        let tagged_file = Self::open(audio).map_err(|e| TagError::read_failed(audio, e))?;
        Ok(tagged_file.tags().iter().any(|tag| {
            tag.pictures()
                .iter()
                .any(|p| p.pic_type() == PictureType::CoverFront)
        }))
    }
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
