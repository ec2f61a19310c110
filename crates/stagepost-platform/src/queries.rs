//! GraphQL documents sent to the platform's admin endpoint.

pub(crate) const STAGED_UPLOADS_CREATE: &str = r#"
mutation stagedUploadsCreate($input: [StagedUploadInput!]!) {
  stagedUploadsCreate(input: $input) {
    stagedTargets {
      url
      resourceUrl
      parameters {
        name
        value
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub(crate) const FILE_CREATE: &str = r#"
mutation fileCreate($files: [FileCreateInput!]!) {
  fileCreate(files: $files) {
    files {
      __typename
      ... on GenericFile { id }
      ... on MediaImage { id }
      ... on Video { id }
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub(crate) const FILE_STATUS: &str = r#"
query fileStatus($id: ID!) {
  node(id: $id) {
    __typename
    ... on GenericFile {
      fileStatus
      url
    }
    ... on MediaImage {
      fileStatus
      image {
        url
      }
    }
    ... on Video {
      fileStatus
      sources {
        url
        format
      }
    }
  }
}
"#;
