use serde::Deserialize;

// Catalog metadata submitted by clients alongside favorite and
// playlist-insertion actions. The client is the source of truth here:
// whatever it sends is upserted by external catalog id.

#[derive(Deserialize, Clone)]
pub struct ArtistPayload {
    pub name: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    #[serde(rename = "iTunesViewUrl")]
    pub itunes_view_url: String,
    pub genre: String,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPayload {
    pub name: String,
    pub portrait: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    #[serde(rename = "iTunesViewUrl")]
    pub itunes_view_url: String,
    pub release_date: String,
    pub genre: String,
}

/// Bare song fields, without the nested artist/album.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrackPayload {
    pub name: String,
    pub portrait: String,
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
    #[serde(rename = "iTunesViewUrl")]
    pub itunes_view_url: String,
    pub preview_url: String,
    pub release_date: String,
    #[serde(rename = "durationInSeconds")]
    pub duration_seconds: i32,
    pub genre: String,
}

/// A song together with its artist and album, as sent when favoriting a song
/// or adding one to a playlist.
#[derive(Deserialize, Clone)]
pub struct SongPayload {
    #[serde(flatten)]
    pub track: TrackPayload,
    pub artist: ArtistPayload,
    pub album: AlbumPayload,
}

/// An album together with its artist and track list, as sent when favoriting
/// an album.
#[derive(Deserialize, Clone)]
pub struct AlbumFavoritePayload {
    #[serde(flatten)]
    pub album: AlbumPayload,
    pub artist: ArtistPayload,
    pub songs: Vec<TrackPayload>,
}

#[derive(Deserialize, Clone)]
pub struct TrackWithAlbumPayload {
    #[serde(flatten)]
    pub track: TrackPayload,
    pub album: AlbumPayload,
}

/// An artist with albums and songs, as sent when favoriting an artist.
#[derive(Deserialize, Clone)]
pub struct ArtistFavoritePayload {
    #[serde(flatten)]
    pub artist: ArtistPayload,
    pub albums: Vec<AlbumPayload>,
    pub songs: Vec<TrackWithAlbumPayload>,
}

/// External catalog id reference, used by the unfavorite requests.
#[derive(Deserialize, Clone)]
pub struct ItunesRef {
    #[serde(rename = "iTunesId")]
    pub itunes_id: i64,
}
