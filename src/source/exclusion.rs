use tracing::trace;

use super::{
    Album, Artist, Audio, ChangeStream, Folder, Genre, Query, RecordSource, Resource, Scope,
    SourceError,
};

/// Hides blacklisted paths and too-short tracks from everything downstream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionFilter {
    pub blacklist: Vec<String>,
    pub min_track_secs: u64,
}

impl ExclusionFilter {
    pub fn new(blacklist: Vec<String>, min_track_secs: u64) -> Self {
        ExclusionFilter {
            blacklist,
            min_track_secs,
        }
    }

    pub fn is_blacklisted(&self, path: &str) -> bool {
        self.blacklist.iter().any(|p| {
            path == p
                || path
                    .strip_prefix(p.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn excludes(&self, audio: &Audio) -> bool {
        audio.duration_secs() <= self.min_track_secs as i64 || self.is_blacklisted(&audio.path)
    }
}

/// A [`RecordSource`] with an [`ExclusionFilter`] applied to its results
pub struct FilteredSource<S> {
    inner: S,
    exclusion: ExclusionFilter,
}

impl<S: RecordSource> FilteredSource<S> {
    pub fn new(inner: S, exclusion: ExclusionFilter) -> Self {
        FilteredSource { inner, exclusion }
    }
}

#[async_trait::async_trait]
impl<S: RecordSource> RecordSource for FilteredSource<S> {
    async fn audios(&self, scope: &Scope, query: &Query) -> Result<Vec<Audio>, SourceError> {
        let audios = self.inner.audios(scope, query).await?;
        let total = audios.len();
        let kept: Vec<Audio> = audios
            .into_iter()
            .filter(|a| !self.exclusion.excludes(a))
            .collect();
        trace!("Excluded {} of {} audios", total - kept.len(), total);
        Ok(kept)
    }

    async fn artists(&self, query: &Query) -> Result<Vec<Artist>, SourceError> {
        self.inner.artists(query).await
    }

    async fn albums(&self, query: &Query) -> Result<Vec<Album>, SourceError> {
        self.inner.albums(query).await
    }

    async fn genres(&self, query: &Query) -> Result<Vec<Genre>, SourceError> {
        self.inner.genres(query).await
    }

    async fn folders(&self, query: &Query) -> Result<Vec<Folder>, SourceError> {
        let folders = self.inner.folders(query).await?;
        Ok(folders
            .into_iter()
            .filter(|f| !self.exclusion.is_blacklisted(&f.path))
            .collect())
    }

    async fn find_audio(&self, id: i64) -> Result<Option<Audio>, SourceError> {
        let audio = self.inner.find_audio(id).await?;
        Ok(audio.filter(|a| !self.exclusion.excludes(a)))
    }

    fn observe(&self, resource: Resource) -> ChangeStream {
        self.inner.observe(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_audio, MemorySource};

    fn exclusion() -> ExclusionFilter {
        ExclusionFilter::new(vec!["/music/voice".to_string()], 30)
    }

    #[test]
    fn test_blacklist_matches_path_and_children_only() {
        let filter = exclusion();
        assert!(filter.is_blacklisted("/music/voice"));
        assert!(filter.is_blacklisted("/music/voice/memo.m4a"));
        assert!(!filter.is_blacklisted("/music/voiceover/take.mp3"));
        assert!(!filter.is_blacklisted("/music/rock/song.mp3"));
    }

    #[test]
    fn test_min_length_is_exclusive() {
        let filter = exclusion();
        assert!(filter.excludes(&sample_audio(1, "Jingle", "/music/a.mp3", 30_999)));
        assert!(!filter.excludes(&sample_audio(2, "Song", "/music/b.mp3", 31_000)));
    }

    #[tokio::test]
    async fn test_filtered_source_drops_excluded_audios() {
        let memory = MemorySource::new();
        memory.put_audio(sample_audio(1, "Memo", "/music/voice/memo.m4a", 120_000));
        memory.put_audio(sample_audio(2, "Song", "/music/rock/song.mp3", 200_000));
        memory.put_audio(sample_audio(3, "Jingle", "/music/rock/jingle.mp3", 5_000));

        let source = FilteredSource::new(memory, exclusion());
        let audios = source.audios(&Scope::All, &Query::default()).await.unwrap();

        let ids: Vec<i64> = audios.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(source.find_audio(1).await.unwrap().is_none());
        assert!(source.find_audio(2).await.unwrap().is_some());
    }
}
