//! In-page node location functions.
//!
//! Each locator kind is a function declaration injected into the context's
//! default realm; it receives the query, the node cap and the start nodes,
//! and always returns an array of nodes.

/// CSS selector search.
pub const CSS_LOCATOR: &str = "(selector, maxCount, ...startNodes) => {\
 const roots = startNodes.length > 0 ? startNodes : [document];\
 const found = [];\
 for (const root of roots) {\
   for (const node of root.querySelectorAll(selector)) {\
     found.push(node);\
     if (maxCount !== null && found.length >= maxCount) return found;\
   }\
 }\
 return found;\
}";

/// XPath expression search.
pub const XPATH_LOCATOR: &str = "(expression, maxCount, ...startNodes) => {\
 const roots = startNodes.length > 0 ? startNodes : [document];\
 const found = [];\
 for (const root of roots) {\
   const snapshot = document.evaluate(\
     expression, root, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);\
   for (let i = 0; i < snapshot.snapshotLength; i++) {\
     found.push(snapshot.snapshotItem(i));\
     if (maxCount !== null && found.length >= maxCount) return found;\
   }\
 }\
 return found;\
}";

/// Rendered-text search over element innerText.
pub const INNER_TEXT_LOCATOR: &str = "(query, maxCount, fullMatch, ignoreCase, maxDepth, ...startNodes) => {\
 const roots = startNodes.length > 0 ? startNodes : [document.documentElement];\
 const found = [];\
 const normalise = (text) => ignoreCase ? text.toLowerCase() : text;\
 const needle = normalise(query);\
 const visit = (element, depth) => {\
   if (maxDepth !== null && depth > maxDepth) return;\
   const text = normalise(element.innerText ?? '');\
   const matches = fullMatch ? text === needle : text.includes(needle);\
   if (matches) {\
     let leafMost = true;\
     for (const child of element.children) {\
       const childText = normalise(child.innerText ?? '');\
       if (fullMatch ? childText === needle : childText.includes(needle)) {\
         leafMost = false;\
         break;\
       }\
     }\
     if (leafMost) found.push(element);\
   }\
   if (maxCount !== null && found.length >= maxCount) return;\
   for (const child of element.children) visit(child, depth + 1);\
 };\
 for (const root of roots) visit(root, 0);\
 return maxCount !== null ? found.slice(0, maxCount) : found;\
}";

/// Accessibility name/role search.
///
/// Roles are approximated from explicit `role` attributes and the
/// implicit roles of common elements; names from the ARIA naming
/// attributes and labels.
pub const ACCESSIBILITY_LOCATOR: &str = "(filter, maxCount, ...startNodes) => {\
 const roots = startNodes.length > 0 ? startNodes : [document.documentElement];\
 const implicitRoles = {\
   a: 'link', area: 'link', article: 'article', aside: 'complementary',\
   button: 'button', datalist: 'listbox', dd: 'definition', details: 'group',\
   dialog: 'dialog', dt: 'term', fieldset: 'group', figure: 'figure',\
   footer: 'contentinfo', form: 'form', h1: 'heading', h2: 'heading',\
   h3: 'heading', h4: 'heading', h5: 'heading', h6: 'heading',\
   header: 'banner', hr: 'separator', img: 'img', input: 'textbox',\
   li: 'listitem', main: 'main', menu: 'list', nav: 'navigation',\
   ol: 'list', option: 'option', output: 'status', progress: 'progressbar',\
   section: 'region', select: 'combobox', summary: 'button', table: 'table',\
   tbody: 'rowgroup', td: 'cell', textarea: 'textbox', tfoot: 'rowgroup',\
   th: 'columnheader', thead: 'rowgroup', tr: 'row', ul: 'list',\
 };\
 const roleOf = (element) => {\
   const explicit = element.getAttribute('role');\
   if (explicit) return explicit;\
   return implicitRoles[element.localName] ?? '';\
 };\
 const nameOf = (element) => {\
   const label = element.getAttribute('aria-label');\
   if (label) return label;\
   const labelledBy = element.getAttribute('aria-labelledby');\
   if (labelledBy) {\
     const parts = labelledBy.split(/\\s+/)\
       .map((id) => document.getElementById(id)?.innerText ?? '');\
     return parts.join(' ').trim();\
   }\
   if (element.labels && element.labels.length > 0) {\
     return Array.from(element.labels).map((l) => l.innerText).join(' ').trim();\
   }\
   return (element.innerText ?? '').trim();\
 };\
 const found = [];\
 const visit = (element) => {\
   const roleMatches = filter.role == null || roleOf(element) === filter.role;\
   const nameMatches = filter.name == null || nameOf(element) === filter.name;\
   if (roleMatches && nameMatches) found.push(element);\
   if (maxCount !== null && found.length >= maxCount) return;\
   for (const child of element.children) visit(child);\
 };\
 for (const root of roots) visit(root);\
 return maxCount !== null ? found.slice(0, maxCount) : found;\
}";
