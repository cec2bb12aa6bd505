//! Render plan of the room page.
//!
//! Turns the share, roster and chat state into a decision about which tiles
//! are shown and how they're arranged. Resolution is pure: the same
//! [`LayoutInput`] always gives the same [`RenderPlan`].

use crate::{
    conf, media::MediaStreamHandle, room::PeerEntry, signalling::PeerId,
};

/// Single video tile of the room page.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// ID of the participant shown in this [`Tile`].
    pub peer_id: PeerId,

    /// Name of the participant shown in this [`Tile`].
    pub user_name: String,

    /// Media shown in this [`Tile`].
    ///
    /// Only the local tile may have no media: it's rendered as a
    /// placeholder until the local stream is acquired.
    pub stream: Option<MediaStreamHandle>,

    /// Indicator whether this [`Tile`] shows the local participant.
    pub is_local: bool,
}

impl Tile {
    /// Creates a [`Tile`] of the local participant.
    pub fn local(
        peer_id: PeerId,
        user_name: String,
        stream: Option<MediaStreamHandle>,
    ) -> Self {
        Self {
            peer_id,
            user_name,
            stream,
            is_local: true,
        }
    }

    /// Creates a [`Tile`] of a remote participant, if it has any media.
    fn remote(peer: PeerEntry) -> Option<Self> {
        let stream = peer.stream?;
        Some(Self {
            peer_id: peer.peer_id,
            user_name: peer.user_name,
            stream: Some(stream),
            is_local: false,
        })
    }
}

/// Arrangement of the [`Tile`]s.
#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    /// Nobody is sharing a screen: all [`Tile`]s in a fixed multi-column
    /// grid.
    Grid {
        /// Number of the grid columns.
        columns: usize,

        /// [`Tile`]s in rendering order.
        tiles: Vec<Tile>,
    },

    /// Shared screen in a large primary pane, with the rest of [`Tile`]s in
    /// a thin sidebar.
    Spotlight {
        /// Shared screen stream.
        primary: MediaStreamHandle,

        /// Number of the sidebar columns.
        sidebar_columns: usize,

        /// Sidebar [`Tile`]s in rendering order.
        tiles: Vec<Tile>,
    },
}

impl Layout {
    /// Returns [`Tile`]s of this [`Layout`] in rendering order.
    pub fn tiles(&self) -> &[Tile] {
        match self {
            Self::Grid { tiles, .. } | Self::Spotlight { tiles, .. } => tiles,
        }
    }
}

/// Decision about how the room page is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Arrangement of the video tiles.
    pub layout: Layout,

    /// Indicator whether the chat side panel is shown.
    pub chat_panel: bool,
}

/// State a [`RenderPlan`] is resolved from.
#[derive(Clone, Debug)]
pub struct LayoutInput {
    /// Stream occupying the screen sharing slot, if it resolves to any.
    pub share_stream: Option<MediaStreamHandle>,

    /// Indicator whether the local participant is the active sharer.
    pub is_local_sharer: bool,

    /// [`Tile`] of the local participant.
    pub local: Tile,

    /// Remote participants, with the active sharer already excluded.
    pub peers: Vec<PeerEntry>,

    /// Indicator whether the chat side panel is open.
    pub chat_open: bool,
}

/// Resolver of [`RenderPlan`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutResolver {
    conf: conf::Layout,
}

impl LayoutResolver {
    /// Creates a new [`LayoutResolver`] with the provided column counts.
    #[inline]
    pub fn new(conf: conf::Layout) -> Self {
        Self { conf }
    }

    /// Resolves the [`RenderPlan`] of the provided [`LayoutInput`].
    ///
    /// The local [`Tile`] goes first, followed by the remote participants
    /// having any media. When the local participant shares its screen, its
    /// [`Tile`] is omitted, as the primary pane shows it already.
    pub fn resolve(&self, input: LayoutInput) -> RenderPlan {
        let LayoutInput {
            share_stream,
            is_local_sharer,
            local,
            peers,
            chat_open,
        } = input;

        let self_tile = if share_stream.is_some() && is_local_sharer {
            None
        } else {
            Some(local)
        };
        let tiles = self_tile
            .into_iter()
            .chain(peers.into_iter().filter_map(Tile::remote))
            .collect();

        let layout = match share_stream {
            Some(primary) => Layout::Spotlight {
                primary,
                sidebar_columns: self.conf.sidebar_columns,
                tiles,
            },
            None => Layout::Grid {
                columns: self.conf.grid_columns,
                tiles,
            },
        };
        RenderPlan {
            layout,
            chat_panel: chat_open,
        }
    }
}
