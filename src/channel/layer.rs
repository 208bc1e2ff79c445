
//! Recover the layer path from a channel name.

use exr::meta::attribute::Text;


/// Split a name at its last dot into the layer path and the last segment.
/// Names without a dot have no layer path.
pub fn split_last_segment(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match name.iter().rposition(|&byte| byte == b'.') {
        Some(dot_index) => (Some(&name[.. dot_index]), &name[dot_index + 1 ..]),
        None => (None, name),
    }
}

/// The part of the name before the first dot, if the name contains a dot.
pub fn first_segment(name: &[u8]) -> Option<&[u8]> {
    name.iter().position(|&byte| byte == b'.')
        .map(|dot_index| &name[.. dot_index])
}

/// Determine the layer of a channel, given the view it was resolved to.
/// Returns `None` for channels in the default layer.
///
/// The last segment is the channel label and never part of the layer.
/// If the remaining path starts with the view, the view prefix is removed.
/// Nested layers like `room.door` are kept as a whole.
pub fn resolve_layer(view: Option<&Text>, full_name: &Text) -> Option<Text> {
    let (path, _) = split_last_segment(full_name.as_slice());
    let path = path.filter(|path| !path.is_empty())?;

    let Some(view) = view else {
        return Some(Text::from_slice_unchecked(path));
    };

    let view = view.as_slice();
    if path == view { return None; }

    let without_view = path.strip_prefix(view)
        .and_then(|rest| rest.strip_prefix(b"."))
        .unwrap_or(path);

    Some(Text::from_slice_unchecked(without_view))
}
