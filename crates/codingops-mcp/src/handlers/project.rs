use codingops_core::{Connection, CreateProjectInput, ProjectTemplate, Result};
use codingops_pipeline::{format, ToolResponse};

use crate::args::Args;

#[derive(Debug, Clone, PartialEq)]
pub struct ListProjectsParams {
    pub project_name: Option<String>,
}

impl ListProjectsParams {
    pub fn parse(args: &Args) -> Result<Self> {
        Ok(Self {
            project_name: args.optional_str("projectName")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProjectParams {
    pub input: CreateProjectInput,
}

impl CreateProjectParams {
    pub fn parse(args: &Args) -> Result<Self> {
        let name = args.required_str("name")?;
        let display_name = args.required_str("displayName")?;
        let template = args.required_enum::<ProjectTemplate>("projectTemplate")?;
        let shared = args.required_flag("shared")?;
        let description = args
            .optional_str("description")?
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            input: CreateProjectInput {
                name: name.trim().to_string(),
                display_name: display_name.trim().to_string(),
                description,
                template,
                shared,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteProjectParams {
    pub project_id: u64,
}

impl DeleteProjectParams {
    pub fn parse(args: &Args) -> Result<Self> {
        Ok(Self {
            project_id: args.required_u64("projectId")?,
        })
    }
}

pub async fn list_projects(
    connection: &Connection,
    params: ListProjectsParams,
) -> Result<ToolResponse> {
    let user_id = connection.resolve_identity().await?;
    let projects = connection
        .api()
        .list_projects(user_id, params.project_name.as_deref())
        .await?;
    Ok(format::projects(&projects))
}

pub async fn create_project(
    connection: &Connection,
    params: CreateProjectParams,
) -> Result<ToolResponse> {
    let name = params.input.name.clone();
    let id = connection.api().create_project(params.input).await?;
    Ok(format::project_created(&name, id))
}

pub async fn delete_project(
    connection: &Connection,
    params: DeleteProjectParams,
) -> Result<ToolResponse> {
    connection.api().delete_project(params.project_id).await?;
    Ok(format::project_deleted(params.project_id))
}
