//! Purpose: List-filter payloads decoded from query strings for the app endpoints.
//! Exports: `AppList`, `AppRoutesList`, `AppDropletsList`, `AppPackagesList`, `AppProcessList`.
//! Role: Declares each filter's query fields and translates filters into list commands.
//! Invariants: Fields hold the raw decoded strings; splitting and parsing happen in translation.
//! Invariants: Allow-lists and strictness live in `ResourceTable`, not in these types.

use crate::core::config::QueryResource;
use crate::core::query::{FieldSet, QueryFields, QueryPayload};
use crate::core::translate::{ToCommand, split_list};
use crate::messages::{
    ListAppsMessage, ListDropletsMessage, ListPackagesMessage, ListProcessesMessage,
    ListRoutesMessage,
};
use crate::payloads::pagination::Pagination;

/// The app whose sub-collection is being listed, taken from the URL path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppGuid(pub String);

impl AppGuid {
    pub fn new(guid: impl Into<String>) -> Self {
        Self(guid.into())
    }
}

/// `GET /apps`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppList {
    pub names: String,
    pub guids: String,
    pub space_guids: String,
    pub order_by: String,
    pub label_selector: String,
    pub pagination: Pagination,
}

impl QueryFields for AppList {
    fn fields() -> FieldSet<Self> {
        FieldSet::<Self>::new()
            .text("names", |t, v| t.names = v)
            .text("guids", |t, v| t.guids = v)
            .text("space_guids", |t, v| t.space_guids = v)
            .order_by("order_by", |t, v| t.order_by = v)
            .text("label_selector", |t, v| t.label_selector = v)
            .embed(|t| &mut t.pagination)
    }
}

impl QueryPayload for AppList {
    const RESOURCE: QueryResource = QueryResource::Apps;
}

impl ToCommand for AppList {
    type Context = ();
    type Command = ListAppsMessage;

    fn to_command(&self, _: &()) -> ListAppsMessage {
        ListAppsMessage {
            names: split_list(&self.names),
            guids: split_list(&self.guids),
            space_guids: split_list(&self.space_guids),
            order_by: self.order_by.clone(),
            label_selector: self.label_selector.clone(),
            pagination: self.pagination.to_message(),
        }
    }
}

/// `GET /apps/{guid}/routes`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppRoutesList {
    pub order_by: String,
    pub pagination: Pagination,
}

impl QueryFields for AppRoutesList {
    fn fields() -> FieldSet<Self> {
        FieldSet::<Self>::new()
            .order_by("order_by", |t, v| t.order_by = v)
            .embed(|t| &mut t.pagination)
    }
}

impl QueryPayload for AppRoutesList {
    const RESOURCE: QueryResource = QueryResource::AppRoutes;
}

impl ToCommand for AppRoutesList {
    type Context = AppGuid;
    type Command = ListRoutesMessage;

    fn to_command(&self, app: &AppGuid) -> ListRoutesMessage {
        ListRoutesMessage {
            app_guids: vec![app.0.clone()],
            order_by: self.order_by.clone(),
            pagination: self.pagination.to_message(),
        }
    }
}

/// `GET /apps/{guid}/droplets`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppDropletsList {
    pub guids: String,
    pub order_by: String,
    pub pagination: Pagination,
}

impl QueryFields for AppDropletsList {
    fn fields() -> FieldSet<Self> {
        FieldSet::<Self>::new()
            .text("guids", |t, v| t.guids = v)
            .order_by("order_by", |t, v| t.order_by = v)
            .embed(|t| &mut t.pagination)
    }
}

impl QueryPayload for AppDropletsList {
    const RESOURCE: QueryResource = QueryResource::AppDroplets;
}

impl ToCommand for AppDropletsList {
    type Context = AppGuid;
    type Command = ListDropletsMessage;

    fn to_command(&self, app: &AppGuid) -> ListDropletsMessage {
        ListDropletsMessage {
            guids: split_list(&self.guids),
            app_guids: vec![app.0.clone()],
            order_by: self.order_by.clone(),
            pagination: self.pagination.to_message(),
        }
    }
}

/// `GET /apps/{guid}/packages`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppPackagesList {
    pub order_by: String,
    pub pagination: Pagination,
}

impl QueryFields for AppPackagesList {
    fn fields() -> FieldSet<Self> {
        FieldSet::<Self>::new()
            .order_by("order_by", |t, v| t.order_by = v)
            .embed(|t| &mut t.pagination)
    }
}

impl QueryPayload for AppPackagesList {
    const RESOURCE: QueryResource = QueryResource::AppPackages;
}

impl ToCommand for AppPackagesList {
    type Context = AppGuid;
    type Command = ListPackagesMessage;

    fn to_command(&self, app: &AppGuid) -> ListPackagesMessage {
        ListPackagesMessage {
            app_guids: vec![app.0.clone()],
            order_by: self.order_by.clone(),
            pagination: self.pagination.to_message(),
        }
    }
}

/// `GET /apps/{guid}/processes`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppProcessList {
    pub order_by: String,
    pub pagination: Pagination,
}

impl QueryFields for AppProcessList {
    fn fields() -> FieldSet<Self> {
        FieldSet::<Self>::new()
            .order_by("order_by", |t, v| t.order_by = v)
            .embed(|t| &mut t.pagination)
    }
}

impl QueryPayload for AppProcessList {
    const RESOURCE: QueryResource = QueryResource::AppProcesses;
}

impl ToCommand for AppProcessList {
    type Context = AppGuid;
    type Command = ListProcessesMessage;

    fn to_command(&self, app: &AppGuid) -> ListProcessesMessage {
        ListProcessesMessage {
            app_guids: vec![app.0.clone()],
            order_by: self.order_by.clone(),
            pagination: self.pagination.to_message(),
        }
    }
}
