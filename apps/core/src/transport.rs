use std::io::{ErrorKind, Read, Write};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::contract::{HostAction, HostEvent};
use crate::core_service::{ExtensionService, ServiceError};
use crate::host::TabMirror;

/// Browsers reject host-to-extension messages above 1 MiB.
pub const MAX_OUTBOUND_FRAME_BYTES: usize = 1024 * 1024;
pub const MAX_INBOUND_FRAME_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge { len: usize, max: usize },
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    ResponseTooLarge,
    NotReady,
    Config,
    Store,
    Pattern,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { actions: Vec<HostAction> },
    Err { error: ErrorResponse },
}

pub fn handle_event(
    service: &mut ExtensionService,
    mirror: &mut TabMirror,
    event: HostEvent,
) -> TransportResponse {
    let mut extra = Vec::new();
    let result: Result<(), ServiceError> = match event {
        HostEvent::TabsSnapshot(snapshot) => {
            mirror.replace_snapshot(snapshot.tabs, snapshot.active);
            service.initialize_tab_tracking(&*mirror);
            Ok(())
        }
        HostEvent::OmniboxInputEntered(input) => {
            service.on_omnibox_entered(mirror, &input.text).map(|_| ())
        }
        HostEvent::OmniboxInputChanged(input) => {
            service.on_omnibox_changed(&input.text).map(|suggestions| {
                extra.push(HostAction::Suggest { suggestions });
            })
        }
        HostEvent::BeforeNavigate(details) => {
            service.on_before_navigate(mirror, &details).map(|_| ())
        }
        HostEvent::TabUpdated(update) => match update.url {
            Some(url) => service
                .on_tab_url_changed(mirror, update.tab_id, &url)
                .map(|_| ()),
            None => Ok(()),
        },
        HostEvent::TabActivated(tab) => {
            mirror.record_activated(tab.tab_id);
            service.on_tab_activated(tab.tab_id);
            Ok(())
        }
        HostEvent::TabRemoved(tab) => {
            mirror.record_removed(tab.tab_id);
            service.on_tab_removed(tab.tab_id);
            Ok(())
        }
        HostEvent::TabCreated(tab) => {
            mirror.record_created(tab.tab_id);
            service.on_tab_created(tab.tab_id);
            Ok(())
        }
        HostEvent::Command(invocation) => {
            service.on_command(mirror, &invocation.command);
            Ok(())
        }
    };

    let mut actions = mirror.take_actions();
    match result {
        Ok(()) => {
            actions.extend(extra);
            TransportResponse::Ok { actions }
        }
        Err(error) => TransportResponse::Err {
            error: map_service_error(error),
        },
    }
}

pub fn handle_json(
    service: &mut ExtensionService,
    mirror: &mut TabMirror,
    payload: &str,
) -> Result<String, TransportError> {
    let response = match serde_json::from_str::<HostEvent>(payload) {
        Ok(event) => handle_event(service, mirror, event),
        Err(error) => error_response(ErrorCode::InvalidJson, error.to_string()),
    };

    Ok(serde_json::to_string(&response)?)
}

/// Answers one raw frame. The reply always fits in an outbound frame: a
/// response over the limit is replaced by a `response_too_large` error.
pub fn handle_frame(
    service: &mut ExtensionService,
    mirror: &mut TabMirror,
    frame: &[u8],
) -> Result<String, TransportError> {
    let reply = match std::str::from_utf8(frame) {
        Ok(payload) => handle_json(service, mirror, payload)?,
        Err(error) => serde_json::to_string(&error_response(
            ErrorCode::InvalidJson,
            format!("frame is not valid utf-8: {error}"),
        ))?,
    };

    if reply.len() <= MAX_OUTBOUND_FRAME_BYTES {
        return Ok(reply);
    }

    warn!(
        "dropping reply of {} bytes over the {MAX_OUTBOUND_FRAME_BYTES} byte limit",
        reply.len()
    );
    Ok(serde_json::to_string(&error_response(
        ErrorCode::ResponseTooLarge,
        format!(
            "reply of {} bytes exceeds limit of {MAX_OUTBOUND_FRAME_BYTES}",
            reply.len()
        ),
    ))?)
}

fn error_response(code: ErrorCode, message: String) -> TransportResponse {
    TransportResponse::Err {
        error: ErrorResponse { code, message },
    }
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    let code = match &error {
        ServiceError::NotReady => ErrorCode::NotReady,
        ServiceError::Config(_) => ErrorCode::Config,
        ServiceError::Store(_) => ErrorCode::Store,
        ServiceError::Pattern(_) => ErrorCode::Pattern,
    };
    ErrorResponse {
        code,
        message: error.to_string(),
    }
}

/// Reads one native-messaging frame: a native-endian `u32` length followed by
/// that many bytes of UTF-8 JSON. Returns `None` on a clean end of stream.
pub fn read_frame(reader: &mut impl Read) -> Result<Option<Vec<u8>>, TransportError> {
    let mut len_bytes = [0_u8; 4];
    loop {
        match reader.read(&mut len_bytes[..1]) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        }
    }
    // A header cut short after its first byte is a broken stream, not a clean end.
    reader.read_exact(&mut len_bytes[1..])?;

    let len = u32::from_ne_bytes(len_bytes) as usize;
    if len > MAX_INBOUND_FRAME_BYTES {
        return Err(TransportError::FrameTooLarge {
            len,
            max: MAX_INBOUND_FRAME_BYTES,
        });
    }

    let mut payload = vec![0_u8; len];
    reader.read_exact(&mut payload)?;
    Ok(Some(payload))
}

pub fn write_frame(writer: &mut impl Write, payload: &[u8]) -> Result<(), TransportError> {
    if payload.len() > MAX_OUTBOUND_FRAME_BYTES {
        return Err(TransportError::FrameTooLarge {
            len: payload.len(),
            max: MAX_OUTBOUND_FRAME_BYTES,
        });
    }

    writer.write_all(&(payload.len() as u32).to_ne_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}
