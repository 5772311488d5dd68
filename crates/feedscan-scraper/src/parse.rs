//! Conversion from wire nodes to [`RawPost`] and [`Comment`] records.

use feedscan_core::{Comment, CommentDetail, MediaType, RawPost};

use crate::types::{CommentNode, MediaNode};

/// Flattens one timeline media node. A missing caption becomes `""`.
pub(crate) fn media_to_raw_post(node: MediaNode) -> RawPost {
    let caption = node
        .edge_media_to_caption
        .edges
        .into_iter()
        .next()
        .map(|e| e.node.text)
        .unwrap_or_default();

    let like_count = node
        .edge_liked_by
        .or(node.edge_media_preview_like)
        .map_or(0, |c| c.count);

    let comment_count = node.edge_media_to_comment.map_or(0, |c| c.count);

    RawPost {
        id: node.id,
        shortcode: node.shortcode,
        caption,
        like_count,
        comment_count,
        timestamp: node.taken_at_timestamp,
        media_type: if node.is_video {
            MediaType::Reel
        } else {
            MediaType::Grid
        },
        thumbnail: node.thumbnail_src,
        comments: CommentDetail::Unavailable,
    }
}

/// Commenter identity falls back from owner id to username; comments with
/// neither keep an empty id.
pub(crate) fn comment_node_to_comment(node: CommentNode) -> Comment {
    let commenter_id = node
        .owner
        .map(|o| if o.id.is_empty() { o.username } else { o.id })
        .unwrap_or_default();
    Comment {
        text: node.text,
        commenter_id,
    }
}
