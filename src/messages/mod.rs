//! Typed messages exchanged with backend mailboxes.
//!
//! Every request kind has exactly one reply kind. [`Request`] and [`Response`]
//! are the closed sets carried by an envelope; the conversions generated below
//! let callers ask with a concrete request type and get back the matching
//! concrete response type.

pub mod agents;
pub mod model;
pub mod pools;

pub use agents::*;
pub use model::{Agent, Device, DeviceType, Pagination, Slot};
pub use pools::*;

macro_rules! define_messages {
    ($($variant:ident($req:ty => $resp:ty)),+ $(,)?) => {
        /// Any request a backend mailbox can receive.
        #[derive(Debug, Clone)]
        pub enum Request {
            $($variant($req),)+
        }

        /// Any reply a backend mailbox can send.
        #[derive(Debug, Clone)]
        pub enum Response {
            $($variant($resp),)+
        }

        impl Request {
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Request::$variant(_) => stringify!($variant),)+
                }
            }
        }

        impl Response {
            pub fn kind(&self) -> &'static str {
                match self {
                    $(Response::$variant(_) => stringify!($variant),)+
                }
            }
        }

        $(
            impl From<$req> for Request {
                fn from(req: $req) -> Self {
                    Request::$variant(req)
                }
            }

            impl From<$resp> for Response {
                fn from(resp: $resp) -> Self {
                    Response::$variant(resp)
                }
            }

            impl TryFrom<Response> for $resp {
                type Error = Response;

                fn try_from(resp: Response) -> Result<Self, Response> {
                    match resp {
                        Response::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )+
    };
}

define_messages! {
    GetAgents(GetAgentsRequest => GetAgentsResponse),
    GetAgent(GetAgentRequest => GetAgentResponse),
    GetSlots(GetSlotsRequest => GetSlotsResponse),
    GetSlot(GetSlotRequest => GetSlotResponse),
    EnableAgent(EnableAgentRequest => EnableAgentResponse),
    DisableAgent(DisableAgentRequest => DisableAgentResponse),
    EnableSlot(EnableSlotRequest => EnableSlotResponse),
    DisableSlot(DisableSlotRequest => DisableSlotResponse),
    GetDefaultGpuPool(GetDefaultGpuPoolRequest => GetDefaultGpuPoolResponse),
    GetDefaultCpuPool(GetDefaultCpuPoolRequest => GetDefaultCpuPoolResponse),
}
