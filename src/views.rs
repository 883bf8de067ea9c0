//! Minimal server-rendered HTML. Rendering is an interface boundary here:
//! plain string assembly, no templating engine.

use crate::db::Project;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn dashboard_page(projects: &[Project]) -> String {
    let mut rows = String::new();
    for p in projects {
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{name}</td><td>{kind}</td>\
             <td><a href=\"{viewer}/{id}\">view</a></td>\
             <td><a href=\"/delete/{id}\">delete</a></td></tr>\n",
            id = p.id,
            name = escape_html(&p.name),
            kind = p.kind.as_str(),
            viewer = p.kind.viewer_path(),
        ));
    }
    let table = if projects.is_empty() {
        "<p>No projects yet.</p>".to_string()
    } else {
        format!(
            "<table>\n<tr><th>#</th><th>Name</th><th>Type</th><th></th><th></th></tr>\n{rows}</table>"
        )
    };
    layout(
        "AR projects",
        &format!(
            "<h1>AR projects</h1>\n{table}\n\
             <p><a href=\"/create\">New project</a> | \
             <a href=\"/wall-ar\">Wall viewer</a> | \
             <a href=\"/logout\">Logout</a></p>"
        ),
    )
}

pub fn pin_page(next_page: &str, error: bool) -> String {
    let notice = if error {
        "<p class=\"error\">Wrong PIN</p>\n"
    } else {
        ""
    };
    layout(
        "Enter PIN",
        &format!(
            "<h1>Enter PIN</h1>\n{notice}\
             <form method=\"post\" action=\"/verify-pin\">\n\
             <input type=\"password\" name=\"pin\" autofocus>\n\
             <input type=\"hidden\" name=\"next_page\" value=\"{}\">\n\
             <button type=\"submit\">Unlock</button>\n</form>\n\
             <p><a href=\"/forgot\">Forgot PIN?</a></p>",
            escape_html(next_page)
        ),
    )
}

pub fn upload_page() -> String {
    layout(
        "New project",
        "<h1>New project</h1>\n\
         <form method=\"post\" action=\"/save\" enctype=\"multipart/form-data\">\n\
         <label>Name <input type=\"text\" name=\"name\"></label><br>\n\
         <label>Type <select name=\"type\">\n\
         <option value=\"image\">image</option>\n\
         <option value=\"model\">model</option>\n\
         </select></label><br>\n\
         <label>File <input type=\"file\" name=\"file\"></label><br>\n\
         <button type=\"submit\">Save</button>\n</form>",
    )
}

pub fn image_viewer_page(project: &Project, asset_url: &str) -> String {
    layout(
        &format!("{} — image AR", project.name),
        &format!(
            "<h1>{}</h1>\n\
             <img src=\"{}\" alt=\"{}\" style=\"max-width:100%\">\n\
             <p><a href=\"/\">Back</a></p>",
            escape_html(&project.name),
            escape_html(asset_url),
            escape_html(&project.name),
        ),
    )
}

pub fn model_viewer_page(project: &Project, asset_url: &str) -> String {
    layout(
        &format!("{} — model AR", project.name),
        &format!(
            "<h1>{}</h1>\n\
             <script type=\"module\" src=\"https://unpkg.com/@google/model-viewer/dist/model-viewer.min.js\"></script>\n\
             <model-viewer src=\"{}\" ar camera-controls auto-rotate \
             style=\"width:100%;height:80vh\"></model-viewer>\n\
             <p><a href=\"/\">Back</a></p>",
            escape_html(&project.name),
            escape_html(asset_url),
        ),
    )
}

pub fn wall_ar_page() -> String {
    layout(
        "Wall AR",
        "<h1>Wall AR</h1>\n\
         <p>Point the camera at a wall to place projects in the room.</p>\n\
         <p><a href=\"/\">Back</a></p>",
    )
}

pub fn forgot_page() -> String {
    layout(
        "Forgot PIN",
        "<h1>Forgot PIN</h1>\n\
         <form method=\"post\" action=\"/send-otp\">\n\
         <label>Email <input type=\"email\" name=\"email\"></label>\n\
         <button type=\"submit\">Send code</button>\n</form>",
    )
}

pub fn reset_page() -> String {
    layout(
        "Reset PIN",
        "<h1>Reset PIN</h1>\n\
         <form method=\"post\" action=\"/save-pin\">\n\
         <label>Code <input type=\"text\" name=\"code\"></label><br>\n\
         <label>New PIN <input type=\"password\" name=\"pin\"></label><br>\n\
         <button type=\"submit\">Save</button>\n</form>",
    )
}

pub fn error_page(title: &str, detail: &str) -> String {
    layout(
        title,
        &format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back</a></p>",
            escape_html(title),
            escape_html(detail)
        ),
    )
}
