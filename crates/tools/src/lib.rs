//! Agent-callable media tools for Feishu / Lark.
//!
//! Tools: `upload_image`, `upload_file`, `download_image`, `download_file`,
//! `send_image`, `send_file`. Every call returns a [`ToolResult`] envelope;
//! failures are values, never errors.

pub mod error;
pub mod feishu_media;
pub mod request;
pub mod result;
pub mod tool_registry;

pub use {
    error::{Error, Result},
    feishu_media::{FeishuMediaTool, MediaTransfer, register_media_tools},
    request::{MediaOperation, MediaRequest},
    result::{ContentBlock, ToolResult},
    tool_registry::{AgentTool, ToolRegistry},
};
