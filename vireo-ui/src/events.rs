//! Projections for the smart-signal payload shapes.

use vireo_bridge::{NativeHandle, PayloadProjection, ProjectionError, RawPayload};

/// A widget item referenced by an item signal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ItemEvent {
    pub item: NativeHandle,
}

/// For notification signals that carry no payload ("language,changed" and
/// friends); whatever pointer arrives is ignored.
pub struct EmptyProjection;

impl PayloadProjection for EmptyProjection {
    type Args = ();

    fn project(&self, _payload: RawPayload) -> Result<(), ProjectionError> {
        Ok(())
    }
}

/// For item signals, where the payload pointer *is* the item handle rather
/// than something to dereference. A null payload on an item signal is
/// malformed and drops the event.
pub struct ItemProjection;

impl PayloadProjection for ItemProjection {
    type Args = ItemEvent;

    fn project(&self, payload: RawPayload) -> Result<ItemEvent, ProjectionError> {
        payload
            .as_handle()
            .map(|item| ItemEvent { item })
            .ok_or(ProjectionError::NullPayload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::c_void;

    #[test]
    fn test_empty_projection_ignores_payload() {
        assert_eq!(EmptyProjection.project(RawPayload::new(std::ptr::null())), Ok(()));
        assert_eq!(
            EmptyProjection.project(RawPayload::new(0x99 as *const c_void)),
            Ok(())
        );
    }

    #[test]
    fn test_item_projection_reads_pointer_as_handle() {
        let event = ItemProjection
            .project(RawPayload::new(0x4420 as *const c_void))
            .unwrap();
        assert_eq!(event.item, NativeHandle::from_raw(0x4420).unwrap());
    }

    #[test]
    fn test_item_projection_rejects_null() {
        assert_eq!(
            ItemProjection.project(RawPayload::new(std::ptr::null())),
            Err(ProjectionError::NullPayload)
        );
    }
}
