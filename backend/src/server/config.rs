//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use foodgram::domain::ShoppingListLayout;
use foodgram::inbound::http::session_config::SessionSettings;
use foodgram::outbound::media::MediaConfig;
use foodgram::outbound::persistence::DbPool;

/// Everything the server needs beyond the health state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) media: MediaConfig,
    pub(crate) page_size: u32,
    pub(crate) shopping_list_layout: ShoppingListLayout,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        db_pool: DbPool,
        media: MediaConfig,
    ) -> Self {
        Self {
            session,
            bind_addr,
            db_pool,
            media,
            page_size: pagination::DEFAULT_PAGE_SIZE,
            shopping_list_layout: ShoppingListLayout::default(),
        }
    }

    /// Page size used when a request omits `limit`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_shopping_list_layout(mut self, layout: ShoppingListLayout) -> Self {
        self.shopping_list_layout = layout;
        self
    }
}
